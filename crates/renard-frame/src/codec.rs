use bytes::{BufMut, BytesMut};
use tracing::debug;

use crate::command::{needs_escape, Command, COMMAND, ESCAPE, PAD, SYNC};
use crate::config::EscapePolicy;
use crate::error::{FrameError, Result};

/// Frame header: `SYNC` + command = 2 bytes.
pub const HEADER_SIZE: usize = 2;

/// Header of a channel-data frame.
pub const HEADER: [u8; HEADER_SIZE] = [SYNC, COMMAND];

const ESCAPED_PAD: u8 = 0x2F;
const ESCAPED_SYNC: u8 = 0x30;
const ESCAPED_ESCAPE: u8 = 0x31;

/// Substitute code for a reserved data value, or `None` if it goes out literally.
pub fn escape(value: u8) -> Option<u8> {
    match value {
        PAD => Some(ESCAPED_PAD),
        SYNC => Some(ESCAPED_SYNC),
        ESCAPE => Some(ESCAPED_ESCAPE),
        _ => None,
    }
}

/// Data value for a substitute code, or `None` if the code is unknown.
pub fn unescape(code: u8) -> Option<u8> {
    match code {
        ESCAPED_PAD => Some(PAD),
        ESCAPED_SYNC => Some(SYNC),
        ESCAPED_ESCAPE => Some(ESCAPE),
        _ => None,
    }
}

/// Wire size of a frame carrying `channels`.
pub fn encoded_len(channels: &[u8]) -> usize {
    HEADER_SIZE
        + channels
            .iter()
            .map(|&value| if needs_escape(value) { 2 } else { 1 })
            .sum::<usize>()
}

/// Encode one channel value.
pub fn encode_value(value: u8, dst: &mut BytesMut) {
    match escape(value) {
        Some(code) => {
            dst.put_u8(ESCAPE);
            dst.put_u8(code);
        }
        None => dst.put_u8(value),
    }
}

/// Encode a channel-data frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────┐
/// │ SYNC   │ COMMAND │ Channel data (one entry per channel)     │
/// │ 0x7E   │ 0x80    │ literal byte, or 0x7F + 0x2F/0x30/0x31   │
/// └────────┴─────────┴──────────────────────────────────────────┘
/// ```
///
/// There is no length, checksum or terminator; both ends know the channel count.
pub fn encode_frame(channels: &[u8], dst: &mut BytesMut) {
    dst.reserve(encoded_len(channels));
    dst.put_slice(&HEADER);
    for &value in channels {
        encode_value(value, dst);
    }
}

/// Counters kept while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Frames decoded completely.
    pub frames: u64,
    /// Frames dropped because the byte after `SYNC` was not a command.
    pub aborted: u64,
    /// Bytes discarded while hunting for `SYNC`.
    pub skipped: u64,
    /// `PAD` bytes discarded inside frames.
    pub pads: u64,
    /// Escape pairs with an unknown substitute code.
    pub invalid_escapes: u64,
}

impl DecodeStats {
    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &DecodeStats) {
        self.frames += other.frames;
        self.aborted += other.aborted;
        self.skipped += other.skipped;
        self.pads += other.pads;
        self.invalid_escapes += other.invalid_escapes;
    }
}

/// Result of feeding one byte to a [`FrameDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The frame is not finished yet.
    NeedMore,
    /// All channels have been stored.
    Complete,
    /// `SYNC` was followed by something other than a command; nothing was stored.
    Aborted { found: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Hunting,
    AwaitCommand,
    Decoding { index: usize, escaped: bool },
}

/// Byte-at-a-time Renard frame decoder.
///
/// ```text
/// Hunting ──SYNC──► AwaitCommand ──COMMAND──► Decoding ──N values──► Complete
///    ▲                   │                      ▲   │
///    └──── other ────────┘ (Aborted)   escaped ─┘   └─ ESCAPE
/// ```
///
/// Values are written straight into the caller's slice. After `Complete` or
/// `Aborted` the decoder is back to hunting for the next `SYNC`.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    channel_count: usize,
    policy: EscapePolicy,
    state: State,
    stats: DecodeStats,
}

impl FrameDecoder {
    /// Create a decoder for frames of `channel_count` values.
    pub fn new(channel_count: usize, policy: EscapePolicy) -> Self {
        Self {
            channel_count,
            policy,
            state: State::Hunting,
            stats: DecodeStats::default(),
        }
    }

    /// Number of values per frame.
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Counters since this decoder was created.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Whether the decoder is still looking for `SYNC`.
    pub fn is_hunting(&self) -> bool {
        self.state == State::Hunting
    }

    /// Drop any partial frame and go back to hunting.
    pub fn reset(&mut self) {
        self.state = State::Hunting;
    }

    /// Feed one wire byte.
    ///
    /// Values are stored into `out` as they arrive, so after an error or a
    /// [`reset`](Self::reset) it may hold part of a frame. An `out` shorter
    /// than `channel_count` fails with [`FrameError::InvalidArgument`] and the
    /// byte is not consumed. Under [`EscapePolicy::Reject`] an unknown escape
    /// code fails with [`FrameError::InvalidEscape`].
    pub fn push(&mut self, byte: u8, out: &mut [u8]) -> Result<Progress> {
        if out.len() < self.channel_count {
            return Err(FrameError::InvalidArgument {
                channel_count: self.channel_count,
                capacity: out.len(),
            });
        }

        match self.state {
            State::Hunting => {
                if byte == SYNC {
                    self.state = State::AwaitCommand;
                } else {
                    self.stats.skipped += 1;
                }
                Ok(Progress::NeedMore)
            }
            State::AwaitCommand => match Command::from_code(byte) {
                Some(Command::ChannelData) => {
                    if self.channel_count == 0 {
                        return Ok(self.complete());
                    }
                    self.state = State::Decoding {
                        index: 0,
                        escaped: false,
                    };
                    Ok(Progress::NeedMore)
                }
                None => {
                    self.state = State::Hunting;
                    self.stats.aborted += 1;
                    debug!(found = byte, "frame aborted: no command after SYNC");
                    Ok(Progress::Aborted { found: byte })
                }
            },
            State::Decoding {
                index,
                escaped: false,
            } => match byte {
                ESCAPE => {
                    self.state = State::Decoding {
                        index,
                        escaped: true,
                    };
                    Ok(Progress::NeedMore)
                }
                PAD => {
                    self.stats.pads += 1;
                    Ok(Progress::NeedMore)
                }
                value => Ok(self.store(index, value, out)),
            },
            State::Decoding {
                index,
                escaped: true,
            } => match unescape(byte) {
                Some(value) => Ok(self.store(index, value, out)),
                None => {
                    self.stats.invalid_escapes += 1;
                    match self.policy {
                        EscapePolicy::Drop => {
                            debug!(code = byte, index, "dropping unknown escape code");
                            self.state = State::Decoding {
                                index,
                                escaped: false,
                            };
                            Ok(Progress::NeedMore)
                        }
                        EscapePolicy::Reject => {
                            self.state = State::Hunting;
                            Err(FrameError::InvalidEscape { code: byte, index })
                        }
                    }
                }
            },
        }
    }

    fn store(&mut self, index: usize, value: u8, out: &mut [u8]) -> Progress {
        out[index] = value;
        let next = index + 1;
        if next == self.channel_count {
            return self.complete();
        }
        self.state = State::Decoding {
            index: next,
            escaped: false,
        };
        Progress::NeedMore
    }

    fn complete(&mut self) -> Progress {
        self.state = State::Hunting;
        self.stats.frames += 1;
        Progress::Complete
    }
}
