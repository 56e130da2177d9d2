use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use renard_frame::{EscapePolicy, DEFAULT_BIT_RATE};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode channel values into one frame.
    Encode(EncodeArgs),
    /// Decode frames from a captured byte stream.
    Decode(DecodeArgs),
    /// Transmit channel values to a serial device.
    Send(SendArgs),
    /// Read and print frames from a serial device.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Send(args) => send::run(args),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Channel values (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_channel_value, conflicts_with = "file")]
    pub values: Vec<u8>,
    /// Read channel values as raw bytes from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Channels per frame.
    #[arg(long, short = 'n')]
    pub channels: usize,
    /// Read the wire stream from a file instead of stdin.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// Wire stream as hex text (e.g. "7E 80 01 7F 30 FF").
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Fail frames with unknown escape codes instead of dropping the code.
    #[arg(long)]
    pub strict: bool,
    /// Stop after N frames.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device path.
    #[arg(env = "RENARD_DEVICE")]
    pub device: PathBuf,
    /// Channel values (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_channel_value, required = true)]
    pub values: Vec<u8>,
    /// Line bit rate.
    #[arg(long, env = "RENARD_BAUD", default_value_t = DEFAULT_BIT_RATE)]
    pub baud: u32,
    /// Number of times to send the frame.
    #[arg(long, default_value = "1")]
    pub repeat: u32,
    /// Delay between repeated frames (e.g. 25ms, 1s).
    #[arg(long, default_value = "25ms")]
    pub interval: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device path.
    #[arg(env = "RENARD_DEVICE")]
    pub device: PathBuf,
    /// Channels per frame.
    #[arg(long, short = 'n')]
    pub channels: usize,
    /// Line bit rate.
    #[arg(long, env = "RENARD_BAUD", default_value_t = DEFAULT_BIT_RATE)]
    pub baud: u32,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<u64>,
    /// Maximum wait for each frame (e.g. 5s, 500ms). Default: wait forever.
    #[arg(long)]
    pub timeout: Option<String>,
    /// Fail frames with unknown escape codes instead of dropping the code.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn escape_policy(strict: bool) -> EscapePolicy {
    if strict {
        EscapePolicy::Reject
    } else {
        EscapePolicy::Drop
    }
}

/// Parse a channel value: `255`, `0xFF` or `0XFF`.
pub(crate) fn parse_channel_value(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse::<u8>(),
    };
    parsed.map_err(|_| format!("invalid channel value (expected 0-255 or 0x00-0xFF): {input}"))
}

/// Parse hex text into bytes. Whitespace, `:` and `,` separators are ignored.
pub(crate) fn parse_hex_stream(input: &str) -> CliResult<Vec<u8>> {
    let digits: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':' && *b != b',')
        .collect();

    if digits.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "hex input has an odd number of digits"));
    }

    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| {
                    CliError::new(
                        USAGE,
                        format!("invalid hex byte: {}", String::from_utf8_lossy(pair)),
                    )
                })
        })
        .collect()
}

/// Parse `<number><unit>` with unit `us`, `ms`, `s` or `m`. A bare number is
/// milliseconds, the natural unit for frame intervals.
pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration: {input:?}")))?;

    let duration = match unit.trim() {
        "us" => Duration::from_micros(value),
        "" | "ms" => Duration::from_millis(value),
        "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        other => {
            return Err(CliError::new(
                USAGE,
                format!("unknown duration unit {other:?} (expected us, ms, s or m)"),
            ))
        }
    };
    Ok(duration)
}
