//! Length-prefixed message framing over blocking byte-stream transports.
//!
//! A [`FramedTransport`] wraps any [`Transport`] (a socket, a pipe, an
//! in-memory buffer) and presents the same byte-stream interface while
//! delimiting the data into discrete frames, so that a reader can
//! reconstruct exactly the byte ranges the writer intended as one logical
//! message. Each frame on the wire is a 4-byte unsigned big-endian length
//! followed by that many payload bytes; there is no magic number, version
//! tag, or checksum.
//!
//! Because the framed wrapper implements [`Transport`] itself, a higher
//! serialization layer that only needs "read the current message" and
//! "write these bytes, then flush a message" semantics can stack on top of
//! it without knowing about framing.
//!
//! # Example
//!
//! ```
//! use framed_transport::{MemoryTransport, Transport};
//!
//! # fn main() -> std::io::Result<()> {
//! let mut transport = MemoryTransport::new().framed();
//!
//! transport.write(b"hello")?;
//! transport.flush()?;
//!
//! assert_eq!(&transport.read(5)?[..], b"hello");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![doc(html_root_url = "https://docs.rs/framed-transport/0.1")]

use std::io;

use bytes::{Bytes, BytesMut};

mod framed;
mod framed_read;
mod framed_write;
mod mem;
mod tcp;

pub use crate::framed::FramedTransport;
pub use crate::mem::MemoryTransport;
pub use crate::tcp::TcpTransport;

/// A blocking, bidirectional byte-stream capability.
///
/// This is the contract shared by raw transports (TCP sockets, pipes,
/// in-memory buffers) and by wrappers layered over them, which is what makes
/// transparent stacking possible: [`FramedTransport`] consumes a `Transport`
/// and is one.
///
/// Every operation blocks the calling thread until it completes or fails.
/// Implementations provide `open`, `close`, `is_open`, `read`, `write` and
/// `flush`; the remaining operations have default implementations built on
/// `read`.
pub trait Transport {
    /// Opens the transport, establishing whatever underlying resource it
    /// speaks to.
    fn open(&mut self) -> io::Result<()>;

    /// Closes the transport and releases the underlying resource.
    ///
    /// Buffered but unflushed data is discarded, not flushed implicitly.
    fn close(&mut self) -> io::Result<()>;

    /// Returns `true` while the transport is able to transfer bytes.
    fn is_open(&self) -> bool;

    /// Reads up to `n` bytes from the transport.
    ///
    /// May return fewer than `n` bytes when fewer are available in a single
    /// pull. An empty result for a non-zero `n` indicates the end of the
    /// stream.
    fn read(&mut self, n: usize) -> io::Result<Bytes>;

    /// Reads exactly one byte.
    fn read_byte(&mut self) -> io::Result<u8> {
        let byte = self.read_exactly(1)?;
        Ok(byte[0])
    }

    /// Fills `dst` completely with bytes from the transport.
    ///
    /// Returns the number of bytes copied, which equals `dst.len()` on
    /// success; an end of stream before `dst` is full is an
    /// [`UnexpectedEof`](io::ErrorKind::UnexpectedEof) error.
    fn read_into_buffer(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < dst.len() {
            let chunk = self.read(dst.len() - filled)?;
            if chunk.is_empty() {
                return Err(eof());
            }
            dst[filled..filled + chunk.len()].copy_from_slice(&chunk);
            filled += chunk.len();
        }
        Ok(filled)
    }

    /// Reads exactly `n` bytes, failing if the stream ends first.
    ///
    /// This is the exact-read primitive framing relies on for the length
    /// header and the frame payload: a short read is an
    /// [`UnexpectedEof`](io::ErrorKind::UnexpectedEof) error, never a short
    /// result.
    fn read_exactly(&mut self, n: usize) -> io::Result<Bytes> {
        let mut out = BytesMut::with_capacity(n);
        while out.len() < n {
            let chunk = self.read(n - out.len())?;
            if chunk.is_empty() {
                return Err(eof());
            }
            out.extend_from_slice(&chunk);
        }
        Ok(out.freeze())
    }

    /// Writes the whole of `buf` to the transport.
    fn write(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flushes any bytes the transport has buffered.
    fn flush(&mut self) -> io::Result<()>;

    /// Wraps this transport in a [`FramedTransport`] with both directions
    /// framed.
    fn framed(self) -> FramedTransport<Self>
    where
        Self: Sized,
    {
        FramedTransport::new(self)
    }
}

fn eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "transport ended mid-read")
}
