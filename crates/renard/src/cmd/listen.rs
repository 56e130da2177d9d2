use renard_frame::{CancelToken, FrameError, RenardCodec, RenardConfig};
use renard_transport::SerialPort;
use tracing::{info, warn};

use crate::cmd::{escape_policy, parse_duration, ListenArgs};
use crate::exit::{frame_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_frame, print_stats, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let read_timeout = args.timeout.as_deref().map(parse_duration).transpose()?;
    let cancel = CancelToken::new();
    install_ctrlc_handler(cancel.clone())?;

    let config = RenardConfig {
        read_timeout,
        escape_policy: escape_policy(args.strict),
        cancel: Some(cancel),
        ..RenardConfig::with_bit_rate(args.baud)
    };
    let mut codec = RenardCodec::with_config(SerialPort::new(&args.device), config);
    codec
        .begin(vec![0u8; args.channels], args.channels)
        .map_err(|err| frame_error("open failed", err))?;
    info!(device = %args.device.display(), baud = args.baud, "listening");

    let mut received = 0u64;
    let result = loop {
        if args.count.is_some_and(|count| received >= count) {
            break Ok(SUCCESS);
        }

        match codec.read() {
            Ok(()) => {
                if let Some(channels) = codec.channels() {
                    print_frame(received, channels, format);
                }
                received = received.saturating_add(1);
            }
            Err(err) if err.is_retryable() => {
                warn!(error = %err, "skipping damaged frame");
            }
            Err(FrameError::Cancelled) => break Ok(SUCCESS),
            Err(err) => break Err(frame_error("receive failed", err)),
        }
    };

    print_stats(codec.stats(), format);
    result
}

fn install_ctrlc_handler(cancel: CancelToken) -> CliResult<()> {
    ctrlc::set_handler(move || cancel.cancel())
        .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
