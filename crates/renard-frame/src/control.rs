use renard_transport::ByteTransport;
use tracing::{debug, info};

use crate::codec::DecodeStats;
use crate::config::RenardConfig;
use crate::error::{FrameError, Result};
use crate::reader::FrameReader;
use crate::writer::FrameWriter;

/// Renard codec bound to a transport and a caller-supplied channel buffer.
///
/// `B` is anything that exposes a byte slice: a borrowed `&mut [u8]` keeps the
/// buffer owned by the caller, a `Vec<u8>` hands ownership to the codec.
///
/// ```
/// use renard_frame::RenardCodec;
/// use renard_transport::MemoryTransport;
///
/// let mut levels = [0u8; 3];
/// let mut codec = RenardCodec::new(MemoryTransport::new(), 57_600);
/// codec.begin(&mut levels[..], 3)?;
/// codec.channels_mut().unwrap().copy_from_slice(&[0x01, 0x7E, 0xFF]);
/// codec.write()?;
/// assert_eq!(codec.transport().written(), &[0x7E, 0x80, 0x01, 0x7F, 0x30, 0xFF]);
/// # Ok::<(), renard_frame::FrameError>(())
/// ```
pub struct RenardCodec<T, B = Vec<u8>> {
    transport: T,
    config: RenardConfig,
    binding: Option<Binding<B>>,
    stats: DecodeStats,
}

struct Binding<B> {
    buffer: B,
    channel_count: usize,
}

impl<T, B> RenardCodec<T, B>
where
    T: ByteTransport,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a codec that will open `transport` at `bit_rate`.
    ///
    /// The transport is not touched until [`begin`](Self::begin).
    pub fn new(transport: T, bit_rate: u32) -> Self {
        Self::with_config(transport, RenardConfig::with_bit_rate(bit_rate))
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(transport: T, config: RenardConfig) -> Self {
        Self {
            transport,
            config,
            binding: None,
            stats: DecodeStats::default(),
        }
    }

    /// Bind the channel buffer, open the transport and zero the channels.
    ///
    /// Fails with [`FrameError::InvalidArgument`] when `buffer` is shorter than
    /// `channel_count`; neither the buffer nor the transport is touched then.
    /// Calling `begin` again replaces the previous binding.
    pub fn begin(&mut self, mut buffer: B, channel_count: usize) -> Result<()> {
        let capacity = buffer.as_ref().len();
        if capacity < channel_count {
            return Err(FrameError::InvalidArgument {
                channel_count,
                capacity,
            });
        }

        self.transport
            .open(self.config.bit_rate)
            .map_err(FrameError::from_transport)?;

        buffer.as_mut()[..channel_count].fill(0);
        self.binding = Some(Binding {
            buffer,
            channel_count,
        });

        info!(
            bit_rate = self.config.bit_rate,
            channel_count, "renard codec ready"
        );
        Ok(())
    }

    /// Send the current channel values as one frame.
    pub fn write(&mut self) -> Result<()> {
        let binding = self.binding.as_ref().ok_or(FrameError::NotInitialized)?;
        let channels = &binding.buffer.as_ref()[..binding.channel_count];

        let mut writer = FrameWriter::new(&mut self.transport);
        writer.write_frame(channels)?;
        Ok(())
    }

    /// Receive one frame into the channel buffer (blocking).
    ///
    /// The buffer is updated only when a whole frame arrives; after any error
    /// it still holds the previous frame. On [`FrameError::UnexpectedCommand`]
    /// call `read` again to resynchronize. See [`FrameReader::read_frame`].
    pub fn read(&mut self) -> Result<()> {
        let binding = self.binding.as_mut().ok_or(FrameError::NotInitialized)?;
        let channels = &mut binding.buffer.as_mut()[..binding.channel_count];

        let mut reader = FrameReader::with_config(&mut self.transport, self.config.clone());
        let result = reader.read_frame(channels);
        self.stats.merge(reader.stats());

        if let Err(err) = &result {
            debug!(error = %err, "renard read failed");
        }
        result
    }

    /// The bound channel values, or `None` before `begin`.
    pub fn channels(&self) -> Option<&[u8]> {
        self.binding
            .as_ref()
            .map(|b| &b.buffer.as_ref()[..b.channel_count])
    }

    /// Mutable access to the bound channel values, or `None` before `begin`.
    pub fn channels_mut(&mut self) -> Option<&mut [u8]> {
        self.binding
            .as_mut()
            .map(|b| &mut b.buffer.as_mut()[..b.channel_count])
    }

    /// Number of bound channels; zero before `begin`.
    pub fn channel_count(&self) -> usize {
        self.binding.as_ref().map_or(0, |b| b.channel_count)
    }

    /// Whether `begin` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.binding.is_some()
    }

    pub fn bit_rate(&self) -> u32 {
        self.config.bit_rate
    }

    pub fn config(&self) -> &RenardConfig {
        &self.config
    }

    /// Decode counters accumulated over every `read`.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport and the bound buffer.
    pub fn into_parts(self) -> (T, Option<B>) {
        (self.transport, self.binding.map(|b| b.buffer))
    }
}

impl<T, B> std::fmt::Debug for RenardCodec<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenardCodec")
            .field("bit_rate", &self.config.bit_rate)
            .field(
                "channel_count",
                &self.binding.as_ref().map(|b| b.channel_count),
            )
            .field("stats", &self.stats)
            .finish()
    }
}
