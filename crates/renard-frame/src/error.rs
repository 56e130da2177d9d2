use std::time::Duration;

use renard_transport::TransportError;

/// Errors that can occur during Renard frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The byte after `SYNC` is not a recognized command; the frame was dropped.
    #[error("frame aborted: expected command after SYNC, found 0x{0:02X}")]
    UnexpectedCommand(u8),

    /// An `ESCAPE` was followed by an unknown substitute code.
    #[error("invalid escape code 0x{code:02X} at channel {index}")]
    InvalidEscape { code: u8, index: usize },

    /// The channel buffer cannot hold the requested channel count.
    #[error("invalid argument: buffer holds {capacity} bytes but {channel_count} channels were requested")]
    InvalidArgument { channel_count: usize, capacity: usize },

    /// `read` or `write` was called before `begin`.
    #[error("codec not initialized (call begin first)")]
    NotInitialized,

    /// No complete frame arrived within the configured read timeout.
    #[error("read timed out after {0:?}")]
    Timeout(Duration),

    /// The read was cancelled through its cancel token.
    #[error("read cancelled")]
    Cancelled,

    /// The transport reached end of input before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FrameError {
    /// Whether calling `read` again can make progress on the same stream.
    ///
    /// True for a dropped frame (bad command byte, rejected escape); the next
    /// call resumes hunting for `SYNC`.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UnexpectedCommand(_) | Self::InvalidEscape { .. })
    }

    pub(crate) fn from_transport(err: TransportError) -> Self {
        match err {
            TransportError::Closed => Self::ConnectionClosed,
            other => Self::Transport(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
