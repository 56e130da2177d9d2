use std::time::Instant;

use renard_transport::ByteTransport;
use tracing::{debug, trace};

use crate::codec::{DecodeStats, FrameDecoder, Progress};
use crate::config::RenardConfig;
use crate::error::{FrameError, Result};

/// Reads complete Renard frames from a [`ByteTransport`].
///
/// Each call hunts for `SYNC`, checks the command byte and decodes one frame.
/// The escape state lives only for the duration of that call.
pub struct FrameReader<T> {
    inner: T,
    config: RenardConfig,
    stats: DecodeStats,
    scratch: Vec<u8>,
}

impl<T: ByteTransport> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, RenardConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: RenardConfig) -> Self {
        Self {
            inner,
            config,
            stats: DecodeStats::default(),
            scratch: Vec::new(),
        }
    }

    /// Read the next frame into `out`, one value per channel (blocking).
    ///
    /// `out` changes only when a whole frame has been decoded; on any error it
    /// keeps its previous contents. [`FrameError::UnexpectedCommand`] means
    /// `SYNC` was followed by an unknown command and the next call resumes
    /// hunting. Blocks until a frame arrives unless the configuration carries a
    /// read timeout or cancel token; the timeout bounds the whole call, busy
    /// line included.
    pub fn read_frame(&mut self, out: &mut [u8]) -> Result<()> {
        let started = Instant::now();
        let mut decoder = FrameDecoder::new(out.len(), self.config.escape_policy);
        self.scratch.clear();
        self.scratch.resize(out.len(), 0);

        let result = loop {
            let byte = match self.next_byte(started) {
                Ok(byte) => byte,
                Err(err) => break Err(err),
            };
            trace!(byte, "read byte");

            match decoder.push(byte, &mut self.scratch) {
                Ok(Progress::NeedMore) => continue,
                Ok(Progress::Complete) => break Ok(()),
                Ok(Progress::Aborted { found }) => break Err(FrameError::UnexpectedCommand(found)),
                Err(err) => break Err(err),
            }
        };

        self.stats.merge(decoder.stats());
        if result.is_ok() {
            out.copy_from_slice(&self.scratch);
            debug!(channels = out.len(), "decoded frame");
        }
        result
    }

    fn next_byte(&mut self, started: Instant) -> Result<u8> {
        loop {
            if let Some(cancel) = &self.config.cancel {
                if cancel.is_cancelled() {
                    return Err(FrameError::Cancelled);
                }
            }

            if let Some(timeout) = self.config.read_timeout {
                if started.elapsed() >= timeout {
                    return Err(FrameError::Timeout(timeout));
                }
            }

            let available = self
                .inner
                .bytes_available()
                .map_err(FrameError::from_transport)?;
            if available > 0 {
                return self.inner.read_byte().map_err(FrameError::from_transport);
            }

            if self.config.poll_interval.is_zero() {
                std::thread::yield_now();
            } else {
                std::thread::sleep(self.config.poll_interval);
            }
        }
    }

    /// Counters accumulated over every call on this reader.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &RenardConfig {
        &self.config
    }
}
