//! Byte-level transport abstraction for Renard serial links.
//!
//! The framing layer only ever talks to a [`ByteTransport`]: open the line at a
//! bit rate, push bytes out, ask how many bytes are waiting, pull one byte in.
//! Three implementations ship here:
//! - [`MemoryTransport`]: in-memory queues for tests and captured streams
//! - [`StreamTransport`]: any blocking `Read + Write` stream
//! - [`SerialPort`]: a serial device opened through the `serialport` crate

pub mod error;
pub mod memory;
pub mod serial;
pub mod stream;
pub mod traits;

pub use error::{Result, TransportError};
pub use memory::MemoryTransport;
pub use serial::SerialPort;
pub use stream::StreamTransport;
pub use traits::ByteTransport;
