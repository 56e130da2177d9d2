use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::ByteTransport;

const READ_CHUNK_SIZE: usize = 256;

/// Adapts any blocking `Read + Write` stream into a [`ByteTransport`].
///
/// Availability is answered from a read-ahead buffer. When the buffer is empty,
/// one read is issued against the stream: `WouldBlock`, `TimedOut` and
/// `Interrupted` count as "nothing yet". A zero-length read is end of input,
/// except in polled mode where it means the device's read timeout expired.
pub struct StreamTransport<S> {
    inner: S,
    pending: BytesMut,
    zero_read_is_eof: bool,
    eof: bool,
}

impl<S: Read + Write> StreamTransport<S> {
    /// Wrap a stream where a zero-length read means the peer closed.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: BytesMut::with_capacity(READ_CHUNK_SIZE),
            zero_read_is_eof: true,
            eof: false,
        }
    }

    /// Wrap a device that returns zero-length reads while idle (raw tty with
    /// `VMIN = 0`).
    pub fn polled(inner: S) -> Self {
        Self {
            zero_read_is_eof: false,
            ..Self::new(inner)
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the transport and return the inner stream.
    ///
    /// Bytes already read ahead are discarded.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn fill(&mut self) -> Result<()> {
        if self.eof {
            return Err(TransportError::Closed);
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        match self.inner.read(&mut chunk) {
            Ok(0) if self.zero_read_is_eof => {
                debug!("stream reached end of input");
                self.eof = true;
                Err(TransportError::Closed)
            }
            Ok(n) => {
                self.pending.extend_from_slice(&chunk[..n]);
                Ok(())
            }
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                Ok(())
            }
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

impl<S: Read + Write> ByteTransport for StreamTransport<S> {
    fn open(&mut self, bit_rate: u32) -> Result<()> {
        debug!(bit_rate, "stream transport ready (bit rate is informational)");
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_all(&[byte])
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes).map_err(|err| match err.kind() {
            ErrorKind::WriteZero | ErrorKind::BrokenPipe => TransportError::Closed,
            _ => TransportError::Io(err),
        })
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn bytes_available(&mut self) -> Result<usize> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.len())
    }

    fn read_byte(&mut self) -> Result<u8> {
        if !self.pending.has_remaining() {
            return Err(TransportError::NoData);
        }
        Ok(self.pending.get_u8())
    }
}

impl<S> std::fmt::Debug for StreamTransport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamTransport")
            .field("pending", &self.pending.len())
            .field("zero_read_is_eof", &self.zero_read_is_eof)
            .field("eof", &self.eof)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn read_all<T: ByteTransport>(t: &mut T) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            match t.bytes_available() {
                Ok(0) => continue,
                Ok(_) => out.push(t.read_byte().unwrap()),
                Err(TransportError::Closed) => return out,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }

    #[test]
    fn reads_cursor_until_closed() {
        let mut t = StreamTransport::new(Cursor::new(vec![0x7E, 0x80, 0x05]));
        assert_eq!(read_all(&mut t), vec![0x7E, 0x80, 0x05]);
        assert!(matches!(t.bytes_available(), Err(TransportError::Closed)));
    }

    #[test]
    fn read_byte_without_data_is_no_data() {
        let mut t = StreamTransport::new(Cursor::new(Vec::<u8>::new()));
        assert!(matches!(t.read_byte(), Err(TransportError::NoData)));
    }

    #[test]
    fn polled_mode_treats_zero_read_as_idle() {
        let mut t = StreamTransport::polled(Cursor::new(Vec::<u8>::new()));
        assert_eq!(t.bytes_available().unwrap(), 0);
        assert_eq!(t.bytes_available().unwrap(), 0);
    }

    #[test]
    fn would_block_counts_as_nothing_available() {
        struct WouldBlockOnce {
            blocked: bool,
        }

        impl Read for WouldBlockOnce {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if !self.blocked {
                    self.blocked = true;
                    return Err(std::io::Error::from(ErrorKind::WouldBlock));
                }
                buf[0] = 0x42;
                Ok(1)
            }
        }

        impl Write for WouldBlockOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut t = StreamTransport::new(WouldBlockOnce { blocked: false });
        assert_eq!(t.bytes_available().unwrap(), 0);
        assert_eq!(t.bytes_available().unwrap(), 1);
        assert_eq!(t.read_byte().unwrap(), 0x42);
    }

    #[test]
    fn writes_reach_inner_stream() {
        let mut t = StreamTransport::new(Cursor::new(Vec::<u8>::new()));
        t.open(115_200).unwrap();
        t.write_byte(0x7E).unwrap();
        t.write_all(&[0x80, 0x10]).unwrap();
        t.flush().unwrap();
        assert_eq!(t.into_inner().into_inner(), vec![0x7E, 0x80, 0x10]);
    }

    #[test]
    #[cfg(unix)]
    fn socket_pair_carries_bytes() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut tx = StreamTransport::new(left);
        let mut rx = StreamTransport::new(right);

        tx.write_all(&[1, 2, 3]).unwrap();
        drop(tx);

        assert_eq!(read_all(&mut rx), vec![1, 2, 3]);
    }
}
