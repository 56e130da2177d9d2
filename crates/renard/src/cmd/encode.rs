use std::fs;

use renard_frame::FrameWriter;
use renard_transport::MemoryTransport;
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let channels = resolve_channels(&args)?;

    let mut writer = FrameWriter::new(MemoryTransport::new());
    let wire_size = writer
        .write_frame(&channels)
        .map_err(|err| frame_error("encode failed", err))?;
    debug!(channels = channels.len(), wire_size, "encoded frame");

    print_encoded(&channels, writer.get_ref().written(), format);
    Ok(SUCCESS)
}

fn resolve_channels(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    match &args.file {
        Some(path) => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        None => Ok(args.values.clone()),
    }
}
