//! Renard lighting-control serial protocol.
//!
//! Renard carries one intensity byte per dimmer channel over an asynchronous
//! serial line, framed by `SYNC` and byte-stuffed so control values never
//! appear inside the data.
//!
//! # Crate Structure
//!
//! - [`transport`]: Byte transport abstraction (memory, stream, serial port)
//! - [`frame`]: Escape transform, decode state machine and the blocking codec

/// Re-export transport types.
pub mod transport {
    pub use renard_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use renard_frame::*;
}

pub use renard_frame::{FrameError, RenardCodec, RenardConfig};
