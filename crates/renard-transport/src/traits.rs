use crate::error::Result;

/// A blocking, byte-oriented serial line.
///
/// This is the only surface the Renard framing layer needs from a transport.
/// Reads are poll-then-pull: callers check [`bytes_available`] and only call
/// [`read_byte`] when it reports at least one byte.
///
/// [`bytes_available`]: ByteTransport::bytes_available
/// [`read_byte`]: ByteTransport::read_byte
pub trait ByteTransport {
    /// Establish the line at the given bit rate.
    fn open(&mut self, bit_rate: u32) -> Result<()>;

    /// Send one byte, blocking as needed.
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Send a run of bytes.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Push any buffered output onto the line.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Number of bytes that can be read without blocking.
    ///
    /// Implementations backed by a blocking stream may wait up to the stream's
    /// own read timeout before answering zero.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read exactly one byte.
    ///
    /// Returns [`TransportError::NoData`](crate::TransportError::NoData) when
    /// nothing is available.
    fn read_byte(&mut self) -> Result<u8>;
}

impl<T: ByteTransport + ?Sized> ByteTransport for &mut T {
    fn open(&mut self, bit_rate: u32) -> Result<()> {
        (**self).open(bit_rate)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
}

impl<T: ByteTransport + ?Sized> ByteTransport for Box<T> {
    fn open(&mut self, bit_rate: u32) -> Result<()> {
        (**self).open(bit_rate)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
}
