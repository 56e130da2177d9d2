mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "renard", version, about = "Renard lighting protocol CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_values() {
        let cli = Cli::try_parse_from(["renard", "encode", "1", "0x7E", "255"])
            .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => assert_eq!(args.values, vec![1, 0x7E, 0xFF]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_channel_value() {
        let err = Cli::try_parse_from(["renard", "encode", "300"])
            .expect_err("value above 255 should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_conflicting_decode_inputs() {
        let err = Cli::try_parse_from([
            "renard",
            "decode",
            "--channels",
            "3",
            "--hex",
            "7E 80",
            "--file",
            "/tmp/capture.bin",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from([
            "renard",
            "--format",
            "json",
            "listen",
            "/dev/ttyUSB0",
            "--channels",
            "8",
            "--baud",
            "115200",
            "--timeout",
            "2s",
        ])
        .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.channels, 8);
                assert_eq!(args.baud, 115_200);
                assert_eq!(args.timeout.as_deref(), Some("2s"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn send_defaults_to_standard_bit_rate() {
        let cli = Cli::try_parse_from(["renard", "send", "/dev/ttyUSB0", "0", "128"])
            .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.values, vec![0, 128]);
                assert_eq!(args.repeat, 1);
                assert_eq!(args.baud, renard_frame::DEFAULT_BIT_RATE);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
