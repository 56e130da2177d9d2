use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use renard_frame::DecodeStats;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename = "frame")]
struct FrameOutput<'a> {
    index: u64,
    channel_count: usize,
    channels: &'a [u8],
    hex: String,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(tag = "type", rename = "encoded")]
struct EncodedOutput<'a> {
    channel_count: usize,
    channels: &'a [u8],
    wire_size: usize,
    escaped: usize,
    frame: String,
}

#[derive(Serialize)]
#[serde(tag = "type", rename = "summary")]
struct StatsOutput {
    frames: u64,
    aborted: u64,
    skipped: u64,
    pads: u64,
    invalid_escapes: u64,
}

impl From<&DecodeStats> for StatsOutput {
    fn from(stats: &DecodeStats) -> Self {
        Self {
            frames: stats.frames,
            aborted: stats.aborted,
            skipped: stats.skipped,
            pads: stats.pads,
            invalid_escapes: stats.invalid_escapes,
        }
    }
}

/// Print one decoded frame.
pub fn print_frame(index: u64, channels: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                index,
                channel_count: channels.len(),
                channels,
                hex: hex(channels),
                timestamp: now_unix_seconds(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FRAME", "CHANNEL", "VALUE", "HEX"]);
            for (channel, value) in channels.iter().enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    channel.to_string(),
                    value.to_string(),
                    format!("{value:02X}"),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame={} channels={} values={}",
                index,
                channels.len(),
                hex(channels)
            );
        }
        OutputFormat::Raw => print_raw(channels),
    }
}

/// Print an encoded frame next to the values it carries.
pub fn print_encoded(channels: &[u8], wire: &[u8], format: OutputFormat) {
    let escaped = wire.len().saturating_sub(renard_frame::HEADER_SIZE + channels.len());
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                channel_count: channels.len(),
                channels,
                wire_size: wire.len(),
                escaped,
                frame: hex(wire),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHANNELS", "WIRE SIZE", "ESCAPED", "FRAME"])
                .add_row(vec![
                    channels.len().to_string(),
                    wire.len().to_string(),
                    escaped.to_string(),
                    hex(wire),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "channels={} wire_size={} escaped={} frame={}",
                channels.len(),
                wire.len(),
                escaped,
                hex(wire)
            );
        }
        OutputFormat::Raw => print_raw(wire),
    }
}

/// Print decode counters. Raw output carries data only, so nothing is printed.
pub fn print_stats(stats: &DecodeStats, format: OutputFormat) {
    let out = StatsOutput::from(stats);
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FRAMES", "ABORTED", "SKIPPED", "PADS", "BAD ESCAPES"])
                .add_row(vec![
                    out.frames.to_string(),
                    out.aborted.to_string(),
                    out.skipped.to_string(),
                    out.pads.to_string(),
                    out.invalid_escapes.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frames={} aborted={} skipped={} pads={} invalid_escapes={}",
                out.frames, out.aborted, out.skipped, out.pads, out.invalid_escapes
            );
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Space-separated uppercase hex, e.g. `7E 80 01`.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_space_separated_uppercase() {
        assert_eq!(hex(&[0x7E, 0x80, 0x0A]), "7E 80 0A");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn frame_json_is_tagged() {
        let out = FrameOutput {
            index: 2,
            channel_count: 2,
            channels: &[1, 0x7E],
            hex: hex(&[1, 0x7E]),
            timestamp: "0".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&out).unwrap();
        assert_eq!(json["type"], "frame");
        assert_eq!(json["channels"], serde_json::json!([1, 126]));
        assert_eq!(json["hex"], "01 7E");
    }

    #[test]
    fn stats_json_is_tagged_summary() {
        let stats = DecodeStats {
            frames: 3,
            aborted: 1,
            ..DecodeStats::default()
        };
        let json = serde_json::to_value(StatsOutput::from(&stats)).unwrap();
        assert_eq!(json["type"], "summary");
        assert_eq!(json["frames"], 3);
        assert_eq!(json["aborted"], 1);
    }
}
