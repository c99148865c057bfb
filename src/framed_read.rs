//! Read-direction half of the framed transport.

use std::cmp;
use std::io;

use bytes::{Buf, Bytes, BytesMut};
use log::trace;

use crate::Transport;

/// Number of bytes in the length prefix of every frame.
pub(crate) const FRAME_HEADER_LEN: usize = 4;

/// Read-direction strategy, selected once at construction.
#[derive(Debug)]
pub(crate) enum ReadHalf {
    /// Reads are served from the payload of the most recently fetched frame.
    Framed {
        /// Payload of the current frame; consumed bytes are advanced away,
        /// and the whole buffer is replaced when the next frame is fetched.
        buf: Bytes,
    },
    /// Reads delegate straight to the inner transport.
    Direct,
}

impl ReadHalf {
    pub(crate) fn new(framed: bool) -> ReadHalf {
        if framed {
            ReadHalf::Framed { buf: Bytes::new() }
        } else {
            ReadHalf::Direct
        }
    }

    pub(crate) fn read<T: Transport>(&mut self, inner: &mut T, n: usize) -> io::Result<Bytes> {
        let buf = match *self {
            ReadHalf::Framed { ref mut buf } => buf,
            ReadHalf::Direct => return inner.read(n),
        };

        if n == 0 {
            return Ok(Bytes::new());
        }

        if buf.is_empty() {
            *buf = fetch_frame(inner)?;
        }

        // Common case: the current frame covers the request, so the result
        // is a zero-copy slice of the frame payload.
        if buf.len() >= n {
            return Ok(buf.split_to(n));
        }

        let mut out = BytesMut::with_capacity(n);
        let rest = buf.len();
        out.extend_from_slice(&buf.split_to(rest));
        while out.len() < n {
            *buf = fetch_frame(inner)?;
            let take = cmp::min(n - out.len(), buf.len());
            out.extend_from_slice(&buf.split_to(take));
        }
        Ok(out.freeze())
    }

    pub(crate) fn read_byte<T: Transport>(&mut self, inner: &mut T) -> io::Result<u8> {
        let buf = match *self {
            ReadHalf::Framed { ref mut buf } => buf,
            ReadHalf::Direct => return inner.read_byte(),
        };

        while buf.is_empty() {
            *buf = fetch_frame(inner)?;
        }

        let byte = buf[0];
        buf.advance(1);
        Ok(byte)
    }

    pub(crate) fn read_into_buffer<T: Transport>(
        &mut self,
        inner: &mut T,
        dst: &mut [u8],
    ) -> io::Result<usize> {
        let buf = match *self {
            ReadHalf::Framed { ref mut buf } => buf,
            ReadHalf::Direct => return inner.read_into_buffer(dst),
        };

        let mut filled = 0;
        while filled < dst.len() {
            if buf.is_empty() {
                *buf = fetch_frame(inner)?;
                continue;
            }
            let take = cmp::min(dst.len() - filled, buf.len());
            dst[filled..filled + take].copy_from_slice(&buf[..take]);
            buf.advance(take);
            filled += take;
        }
        Ok(filled)
    }
}

/// Pulls the next frame off the inner transport: an exact read of the 4-byte
/// big-endian length, then an exact read of that many payload bytes.
fn fetch_frame<T: Transport>(inner: &mut T) -> io::Result<Bytes> {
    let mut header = inner.read_exactly(FRAME_HEADER_LEN)?;
    let len = header.get_u32() as usize;

    trace!("fetching frame; len={}", len);

    inner.read_exactly(len)
}
