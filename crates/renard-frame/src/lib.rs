//! Renard lighting protocol framing.
//!
//! A Renard frame carries one intensity byte per channel:
//! - `SYNC` (0x7E) marks the start of a frame
//! - a command byte follows; 0x80 means "channel data follows"
//! - then one encoded byte per channel, with 0x7D/0x7E/0x7F escaped as
//!   `ESCAPE` (0x7F) plus a substitute code
//!
//! [`RenardCodec`] ties a caller-owned channel buffer to a
//! [`ByteTransport`](renard_transport::ByteTransport) and moves whole frames in
//! either direction.

pub mod cancel;
pub mod codec;
pub mod command;
pub mod config;
pub mod control;
pub mod error;
pub mod reader;
pub mod writer;

pub use cancel::CancelToken;
pub use codec::{
    encode_frame, encode_value, encoded_len, escape, unescape, DecodeStats, FrameDecoder,
    Progress, HEADER, HEADER_SIZE,
};
pub use command::{Command, COMMAND, ESCAPE, PAD, SYNC};
pub use config::{EscapePolicy, RenardConfig, DEFAULT_BIT_RATE, DEFAULT_POLL_INTERVAL};
pub use control::RenardCodec;
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
