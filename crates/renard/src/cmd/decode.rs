use std::fs;
use std::io::Read;

use renard_frame::{FrameError, RenardCodec, RenardConfig};
use renard_transport::MemoryTransport;
use tracing::{debug, warn};

use crate::cmd::{escape_policy, parse_hex_stream, DecodeArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_frame, print_stats, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = resolve_input(&args)?;
    debug!(bytes = input.len(), channels = args.channels, "decoding capture");

    let config = RenardConfig {
        escape_policy: escape_policy(args.strict),
        ..RenardConfig::default()
    };
    let mut codec = RenardCodec::with_config(MemoryTransport::with_input(input), config);
    codec
        .begin(vec![0u8; args.channels], args.channels)
        .map_err(|err| frame_error("decode setup failed", err))?;

    let mut decoded = 0u64;
    loop {
        if args.count.is_some_and(|count| decoded >= count) {
            break;
        }

        match codec.read() {
            Ok(()) => {
                if let Some(channels) = codec.channels() {
                    print_frame(decoded, channels, format);
                }
                decoded = decoded.saturating_add(1);
            }
            Err(err) if err.is_retryable() => {
                warn!(error = %err, "skipping damaged frame");
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("decode failed", err)),
        }
    }

    print_stats(codec.stats(), format);

    if decoded == 0 {
        return Err(CliError::new(DATA_INVALID, "no complete frames in input"));
    }
    Ok(SUCCESS)
}

fn resolve_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex_stream(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }

    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(input)
}
