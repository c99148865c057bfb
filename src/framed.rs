use std::fmt;
use std::io;

use bytes::Bytes;

use crate::framed_read::ReadHalf;
use crate::framed_write::WriteHalf;
use crate::Transport;

/// A transport that delimits an underlying byte stream into length-prefixed
/// frames.
///
/// Each frame on the wire is a 4-byte unsigned big-endian length followed by
/// exactly that many payload bytes. Writes accumulate in an internal buffer
/// until [`flush`](Transport::flush) emits them as a single frame; reads are
/// served from the payload of the most recently received frame, pulling the
/// next frame off the wire whenever the current one is exhausted. `read`,
/// `read_byte` and `read_into_buffer` all cross frame boundaries this way,
/// so in framed mode a read returns exactly the requested number of bytes
/// or fails.
///
/// Framing can be disabled independently per direction at construction, in
/// which case the corresponding operations delegate directly to the inner
/// transport with no length prefix involved.
///
/// No upper bound is placed on the length declared by an incoming frame; a
/// peer declaring an enormous length will cause an attempt to read and
/// buffer that many bytes. Callers that need a bound must enforce it
/// themselves.
///
/// A failure during a frame fetch or a flush leaves the internal buffers in
/// an unspecified state; the instance should be discarded and the
/// underlying connection re-established rather than read further.
///
/// A `FramedTransport` is not safe for concurrent use from multiple
/// threads; callers needing concurrent readers and writers must serialize
/// access externally or use one instance per direction.
pub struct FramedTransport<T> {
    inner: T,
    read: ReadHalf,
    write: WriteHalf,
}

impl<T: Transport> FramedTransport<T> {
    /// Creates a new `FramedTransport` with both directions framed.
    pub fn new(inner: T) -> FramedTransport<T> {
        FramedTransport::with_framing(inner, true, true)
    }

    /// Creates a new `FramedTransport` with the given write-buffer capacity
    /// and both directions framed.
    pub fn with_capacity(cap: usize, inner: T) -> FramedTransport<T> {
        FramedTransport {
            inner,
            read: ReadHalf::new(true),
            write: WriteHalf::with_capacity(true, cap),
        }
    }

    /// Creates a new `FramedTransport`, selecting framed or pass-through
    /// behavior independently per direction.
    ///
    /// A direction constructed as pass-through keeps no buffer of its own
    /// and delegates every call to the inner transport.
    pub fn with_framing(inner: T, read_framed: bool, write_framed: bool) -> FramedTransport<T> {
        FramedTransport {
            inner,
            read: ReadHalf::new(read_framed),
            write: WriteHalf::new(write_framed),
        }
    }
}

impl<T> FramedTransport<T> {
    /// Returns a reference to the underlying transport wrapped by
    /// `FramedTransport`.
    ///
    /// Note that care should be taken to not tamper with the underlying
    /// stream of data coming in as it may corrupt the stream of frames
    /// otherwise being worked with.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Returns a mutable reference to the underlying transport wrapped by
    /// `FramedTransport`.
    ///
    /// Note that care should be taken to not tamper with the underlying
    /// stream of data coming in as it may corrupt the stream of frames
    /// otherwise being worked with.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consumes the `FramedTransport`, returning its underlying transport.
    ///
    /// Any buffered frame data is lost.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Transport> Transport for FramedTransport<T> {
    fn open(&mut self) -> io::Result<()> {
        self.inner.open()
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn read(&mut self, n: usize) -> io::Result<Bytes> {
        self.read.read(&mut self.inner, n)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        self.read.read_byte(&mut self.inner)
    }

    fn read_into_buffer(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        self.read.read_into_buffer(&mut self.inner, dst)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write.write(&mut self.inner, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.write.flush(&mut self.inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for FramedTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramedTransport")
            .field("inner", &self.inner)
            .field("read", &self.read)
            .field("write", &self.write)
            .finish()
    }
}
