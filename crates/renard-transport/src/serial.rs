use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::{Buf, BytesMut};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort as _, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::ByteTransport;

/// How long a blocking read on the device may wait before giving up.
const DEVICE_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A serial device configured as a raw 8N1 line without flow control.
///
/// The device is not touched until [`ByteTransport::open`] is called with the
/// bit rate. Availability is answered from the driver's input queue, so an
/// idle line reports zero without blocking.
pub struct SerialPort {
    path: PathBuf,
    port: Option<Box<dyn serialport::SerialPort>>,
    pending: BytesMut,
    bit_rate: Option<u32>,
}

impl SerialPort {
    /// Describe a serial device; nothing is opened yet.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            port: None,
            pending: BytesMut::new(),
            bit_rate: None,
        }
    }

    /// The device path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bit rate the line was opened at, if open.
    pub fn bit_rate(&self) -> Option<u32> {
        self.bit_rate
    }

    /// Whether `open` has succeeded.
    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "serial"
    }

    fn port(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>> {
        self.port.as_mut().ok_or(TransportError::NotOpen)
    }

    /// Move whatever the driver has queued into `pending`.
    fn fill(&mut self) -> Result<()> {
        let port = self.port.as_mut().ok_or(TransportError::NotOpen)?;
        let queued = port.bytes_to_read()? as usize;
        if queued == 0 {
            return Ok(());
        }

        let start = self.pending.len();
        self.pending.resize(start + queued, 0);
        match port.read(&mut self.pending[start..]) {
            Ok(0) => {
                self.pending.truncate(start);
                Err(TransportError::Closed)
            }
            Ok(n) => {
                self.pending.truncate(start + n);
                Ok(())
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                self.pending.truncate(start);
                Ok(())
            }
            Err(e) => {
                self.pending.truncate(start);
                Err(e.into())
            }
        }
    }
}

impl ByteTransport for SerialPort {
    fn open(&mut self, bit_rate: u32) -> Result<()> {
        if bit_rate == 0 {
            return Err(TransportError::UnsupportedBitRate(bit_rate));
        }

        let port = serialport::new(self.path.to_string_lossy(), bit_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(DEVICE_READ_TIMEOUT)
            .open()
            .map_err(|err| TransportError::Open {
                path: self.path.clone(),
                source: io::Error::from(err),
            })?;
        port.clear(ClearBuffer::All)?;

        info!(path = ?self.path, bit_rate, "opened serial device");
        self.pending.clear();
        self.port = Some(port);
        self.bit_rate = Some(bit_rate);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_all(&[byte])
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.port()?.write_all(bytes).map_err(|e| match e.kind() {
            io::ErrorKind::WriteZero | io::ErrorKind::BrokenPipe => TransportError::Closed,
            _ => TransportError::Io(e),
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.port()?.flush()?;
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.len())
    }

    fn read_byte(&mut self) -> Result<u8> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        if self.pending.is_empty() {
            return Err(TransportError::NoData);
        }
        Ok(self.pending.get_u8())
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        if self.port.is_some() {
            debug!(path = ?self.path, "closing serial device");
        }
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("path", &self.path)
            .field("bit_rate", &self.bit_rate)
            .field("pending", &self.pending.len())
            .finish()
    }
}
