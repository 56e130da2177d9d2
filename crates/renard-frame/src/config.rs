use std::time::Duration;

use crate::cancel::CancelToken;

/// Default line rate for Renard controllers.
pub const DEFAULT_BIT_RATE: u32 = 57_600;

/// Default sleep between availability polls while the line is idle.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// What to do with an `ESCAPE` followed by an unknown code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapePolicy {
    /// Drop the pair and keep decoding; the channel index does not advance.
    #[default]
    Drop,
    /// Fail the read with [`FrameError::InvalidEscape`](crate::FrameError::InvalidEscape).
    Reject,
}

/// Configuration for the Renard codec.
#[derive(Debug, Clone)]
pub struct RenardConfig {
    /// Bit rate passed to the transport on `begin`. Default: 57600.
    pub bit_rate: u32,
    /// Upper bound on a single `read` call. `None` blocks until a frame arrives.
    pub read_timeout: Option<Duration>,
    /// Sleep between availability polls; zero yields the thread instead.
    pub poll_interval: Duration,
    /// Handling of unknown escape codes.
    pub escape_policy: EscapePolicy,
    /// Optional token that aborts blocking reads.
    pub cancel: Option<CancelToken>,
}

impl RenardConfig {
    /// Default configuration at a specific bit rate.
    pub fn with_bit_rate(bit_rate: u32) -> Self {
        Self {
            bit_rate,
            ..Self::default()
        }
    }
}

impl Default for RenardConfig {
    fn default() -> Self {
        Self {
            bit_rate: DEFAULT_BIT_RATE,
            read_timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            escape_policy: EscapePolicy::Drop,
            cancel: None,
        }
    }
}
