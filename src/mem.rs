use std::cmp;
use std::io;

use bytes::{Bytes, BytesMut};

use crate::Transport;

/// A loopback transport backed by an in-memory buffer.
///
/// Writes append to the buffer and reads consume from its front, so a
/// `MemoryTransport` reads back exactly what was written to it. Useful for
/// tests and for staging bytes in process before they reach a real
/// transport.
#[derive(Debug)]
pub struct MemoryTransport {
    buf: BytesMut,
    open: bool,
}

impl MemoryTransport {
    /// Creates an empty transport, already open.
    pub fn new() -> MemoryTransport {
        MemoryTransport {
            buf: BytesMut::new(),
            open: true,
        }
    }

    /// Creates a transport preloaded with `bytes` available for reading.
    pub fn with_bytes(bytes: &[u8]) -> MemoryTransport {
        let mut transport = MemoryTransport::new();
        transport.buf.extend_from_slice(bytes);
        transport
    }

    /// Returns the bytes written but not yet read back.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` when no buffered bytes remain.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for MemoryTransport {
    fn default() -> MemoryTransport {
        MemoryTransport::new()
    }
}

impl Transport for MemoryTransport {
    fn open(&mut self) -> io::Result<()> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn read(&mut self, n: usize) -> io::Result<Bytes> {
        let take = cmp::min(n, self.buf.len());
        Ok(self.buf.split_to(take).freeze())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.buf.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
