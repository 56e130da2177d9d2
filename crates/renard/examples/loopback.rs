//! Encode a frame with one codec and decode it with another.

use renard::frame::{FrameError, RenardCodec};
use renard::transport::MemoryTransport;

fn main() -> Result<(), FrameError> {
    let mut sender = RenardCodec::new(MemoryTransport::new(), 57_600);
    sender.begin(vec![0u8; 4], 4)?;
    if let Some(levels) = sender.channels_mut() {
        levels.copy_from_slice(&[0x00, 0x7D, 0x7E, 0xFF]);
    }
    sender.write()?;

    let wire = sender.transport_mut().take_written();
    println!("wire: {wire:02X?}");

    let mut receiver = RenardCodec::new(MemoryTransport::new(), 57_600);
    receiver.begin(vec![0u8; 4], 4)?;
    receiver.transport_mut().push_input(&[0x13, 0x37]);
    receiver.transport_mut().push_input(&wire);
    receiver.read()?;

    println!("decoded: {:02X?}", receiver.channels().unwrap_or_default());
    println!("stats: {:?}", receiver.stats());
    Ok(())
}
