//! Reserved wire bytes and command codes.
//!
//! Four byte values never appear literally in the data region of a frame.
//! `PAD` may appear between data bytes and is dropped by readers.

/// Filler byte, discarded by readers.
pub const PAD: u8 = 0x7D;

/// Start of frame.
pub const SYNC: u8 = 0x7E;

/// Introduces a two-byte escape sequence.
pub const ESCAPE: u8 = 0x7F;

/// Command code for "channel data follows".
pub const COMMAND: u8 = 0x80;

/// Commands that may follow `SYNC`.
///
/// Only channel data is implemented. New commands are added as variants and
/// dispatched in [`FrameDecoder`](crate::FrameDecoder).
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// A full set of channel values follows.
    ChannelData,
}

impl Command {
    /// The wire code for this command.
    pub const fn code(self) -> u8 {
        match self {
            Self::ChannelData => COMMAND,
        }
    }

    /// Look up a command by its wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            COMMAND => Some(Self::ChannelData),
            _ => None,
        }
    }

    /// Returns a human-readable name for the command.
    pub fn name(self) -> &'static str {
        match self {
            Self::ChannelData => "CHANNEL_DATA",
        }
    }
}

/// Returns true for bytes that must be escaped in the data region.
pub fn needs_escape(byte: u8) -> bool {
    matches!(byte, PAD | SYNC | ESCAPE)
}

/// Returns a human-readable name for a wire byte.
pub fn byte_name(byte: u8) -> &'static str {
    match byte {
        PAD => "PAD",
        SYNC => "SYNC",
        ESCAPE => "ESCAPE",
        COMMAND => "COMMAND",
        _ => "DATA",
    }
}
