use std::collections::VecDeque;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::ByteTransport;

/// In-memory transport: a receive queue fed by the caller and a transmit log.
///
/// Until [`close_input`](Self::close_input) is called an empty receive queue
/// simply reports zero bytes available, like an idle serial line. After closing,
/// an empty queue reports [`TransportError::Closed`] so blocking readers stop.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    bit_rate: Option<u32>,
    input_closed: bool,
}

impl MemoryTransport {
    /// Create an empty transport with an open-ended receive side.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose receive side holds exactly `bytes`, then closes.
    pub fn with_input(bytes: impl IntoIterator<Item = u8>) -> Self {
        let mut transport = Self::new();
        transport.rx.extend(bytes);
        transport.input_closed = true;
        transport
    }

    /// Queue bytes on the receive side.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Mark the receive side as finished.
    pub fn close_input(&mut self) {
        self.input_closed = true;
    }

    /// Bytes still waiting to be read.
    pub fn pending_input(&self) -> usize {
        self.rx.len()
    }

    /// Everything written so far.
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Take everything written so far, leaving the transmit log empty.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }

    /// The bit rate passed to the last successful `open`.
    pub fn bit_rate(&self) -> Option<u32> {
        self.bit_rate
    }
}

impl ByteTransport for MemoryTransport {
    fn open(&mut self, bit_rate: u32) -> Result<()> {
        debug!(bit_rate, "opened in-memory transport");
        self.bit_rate = Some(bit_rate);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.tx.push(byte);
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.tx.extend_from_slice(bytes);
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize> {
        if self.rx.is_empty() && self.input_closed {
            return Err(TransportError::Closed);
        }
        Ok(self.rx.len())
    }

    fn read_byte(&mut self) -> Result<u8> {
        match self.rx.pop_front() {
            Some(byte) => Ok(byte),
            None if self.input_closed => Err(TransportError::Closed),
            None => Err(TransportError::NoData),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_bit_rate_on_open() {
        let mut t = MemoryTransport::new();
        assert_eq!(t.bit_rate(), None);
        t.open(57_600).unwrap();
        assert_eq!(t.bit_rate(), Some(57_600));
    }

    #[test]
    fn open_input_reports_idle_then_data() {
        let mut t = MemoryTransport::new();
        assert_eq!(t.bytes_available().unwrap(), 0);
        assert!(matches!(t.read_byte(), Err(TransportError::NoData)));

        t.push_input(&[0x7E, 0x80]);
        assert_eq!(t.bytes_available().unwrap(), 2);
        assert_eq!(t.read_byte().unwrap(), 0x7E);
        assert_eq!(t.read_byte().unwrap(), 0x80);
        assert_eq!(t.bytes_available().unwrap(), 0);
    }

    #[test]
    fn closed_input_reports_closed_once_drained() {
        let mut t = MemoryTransport::with_input([1]);
        assert_eq!(t.bytes_available().unwrap(), 1);
        assert_eq!(t.read_byte().unwrap(), 1);
        assert!(matches!(t.bytes_available(), Err(TransportError::Closed)));
        assert!(matches!(t.read_byte(), Err(TransportError::Closed)));
    }

    #[test]
    fn transmit_log_accumulates_and_drains() {
        let mut t = MemoryTransport::new();
        t.write_byte(0x7E).unwrap();
        t.write_all(&[0x80, 0x01]).unwrap();
        assert_eq!(t.written(), &[0x7E, 0x80, 0x01]);
        assert_eq!(t.take_written(), vec![0x7E, 0x80, 0x01]);
        assert!(t.written().is_empty());
    }
}
