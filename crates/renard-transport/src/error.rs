use std::path::PathBuf;

/// Errors that can occur in byte transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device at the specified path.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requested bit rate cannot be configured on this transport.
    #[error("unsupported bit rate: {0}")]
    UnsupportedBitRate(u32),

    /// The transport was used before `open` succeeded.
    #[error("transport not open")]
    NotOpen,

    /// `read_byte` was called while no byte was available.
    #[error("no data available")]
    NoData,

    /// The input side reached end of stream.
    #[error("transport closed")]
    Closed,

    /// The serial driver reported an error on an open device.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
