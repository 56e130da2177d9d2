use renard_frame::{RenardCodec, RenardConfig};
use renard_transport::SerialPort;
use tracing::info;

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let mut codec = RenardCodec::with_config(
        SerialPort::new(&args.device),
        RenardConfig::with_bit_rate(args.baud),
    );
    codec
        .begin(vec![0u8; args.values.len()], args.values.len())
        .map_err(|err| frame_error("open failed", err))?;
    if let Some(channels) = codec.channels_mut() {
        channels.copy_from_slice(&args.values);
    }

    for sent in 0..args.repeat {
        if sent > 0 && !interval.is_zero() {
            std::thread::sleep(interval);
        }
        codec
            .write()
            .map_err(|err| frame_error("send failed", err))?;
    }

    info!(
        device = %args.device.display(),
        frames = args.repeat,
        channels = args.values.len(),
        "frames sent"
    );
    Ok(SUCCESS)
}
