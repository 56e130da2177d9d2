use bytes::BytesMut;
use renard_transport::ByteTransport;
use tracing::trace;

use crate::codec::encode_frame;
use crate::error::{FrameError, Result};

/// Writes complete Renard frames to a [`ByteTransport`].
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: ByteTransport> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
        }
    }

    /// Encode `channels` as one frame, send it and flush (blocking).
    ///
    /// Returns the number of bytes put on the wire. The only failures are
    /// transport failures.
    pub fn write_frame(&mut self, channels: &[u8]) -> Result<usize> {
        self.buf.clear();
        encode_frame(channels, &mut self.buf);

        self.inner
            .write_all(&self.buf)
            .map_err(FrameError::from_transport)?;
        self.inner.flush().map_err(FrameError::from_transport)?;

        trace!(channels = channels.len(), wire = self.buf.len(), "wrote frame");
        Ok(self.buf.len())
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use renard_transport::{MemoryTransport, StreamTransport, TransportError};

    use super::*;
    use crate::reader::FrameReader;

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(MemoryTransport::new());
        let written = writer.write_frame(&[0x01, 0x7E, 0xFF]).unwrap();

        assert_eq!(written, 6);
        assert_eq!(
            writer.get_ref().written(),
            &[0x7E, 0x80, 0x01, 0x7F, 0x30, 0xFF]
        );
    }

    #[test]
    fn write_multiple_frames() {
        let mut writer = FrameWriter::new(MemoryTransport::new());
        writer.write_frame(&[1]).unwrap();
        writer.write_frame(&[0x7D]).unwrap();

        assert_eq!(
            writer.into_inner().written(),
            &[0x7E, 0x80, 0x01, 0x7E, 0x80, 0x7F, 0x2F]
        );
    }

    #[test]
    fn empty_frame_is_header_only() {
        let mut writer = FrameWriter::new(MemoryTransport::new());
        assert_eq!(writer.write_frame(&[]).unwrap(), 2);
        assert_eq!(writer.get_ref().written(), &[0x7E, 0x80]);
    }

    #[test]
    fn written_bytes_decode() {
        let channels: Vec<u8> = (0..=255u8).rev().collect();
        let mut writer = FrameWriter::new(StreamTransport::new(Cursor::new(Vec::new())));
        writer.write_frame(&channels).unwrap();

        let wire = writer.into_inner().into_inner().into_inner();
        let mut reader = FrameReader::new(MemoryTransport::with_input(wire));
        let mut out = vec![0u8; channels.len()];
        reader.read_frame(&mut out).unwrap();
        assert_eq!(out, channels);
    }

    #[test]
    fn transport_failure_propagates() {
        struct Unplugged;

        impl ByteTransport for Unplugged {
            fn open(&mut self, _bit_rate: u32) -> renard_transport::Result<()> {
                Ok(())
            }
            fn write_byte(&mut self, _byte: u8) -> renard_transport::Result<()> {
                Err(TransportError::NotOpen)
            }
            fn bytes_available(&mut self) -> renard_transport::Result<usize> {
                Ok(0)
            }
            fn read_byte(&mut self) -> renard_transport::Result<u8> {
                Err(TransportError::NoData)
            }
        }

        let mut writer = FrameWriter::new(Unplugged);
        let err = writer.write_frame(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, FrameError::Transport(TransportError::NotOpen)));
    }

    #[test]
    fn closed_stream_is_connection_closed() {
        struct ZeroWriter;

        impl std::io::Read for ZeroWriter {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Ok(0)
            }
        }

        impl std::io::Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = FrameWriter::new(StreamTransport::new(ZeroWriter));
        let err = writer.write_frame(&[1]).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn accessors() {
        let mut writer = FrameWriter::new(MemoryTransport::new());
        writer.get_mut().push_input(&[1]);
        assert_eq!(writer.get_ref().pending_input(), 1);
    }
}
