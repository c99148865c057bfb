//! Write-direction half of the framed transport.

use std::io;

use bytes::{BufMut, BytesMut};
use log::trace;

use crate::framed_read::FRAME_HEADER_LEN;
use crate::Transport;

const INITIAL_CAPACITY: usize = 8 * 1024;

/// Write-direction strategy, selected once at construction.
#[derive(Debug)]
pub(crate) enum WriteHalf {
    /// Writes accumulate until `flush` emits them as one length-prefixed
    /// frame.
    Framed {
        /// Bytes pending the next flush.
        buf: BytesMut,
    },
    /// Writes and flushes delegate straight to the inner transport.
    Direct,
}

impl WriteHalf {
    pub(crate) fn new(framed: bool) -> WriteHalf {
        WriteHalf::with_capacity(framed, INITIAL_CAPACITY)
    }

    pub(crate) fn with_capacity(framed: bool, cap: usize) -> WriteHalf {
        if framed {
            WriteHalf::Framed {
                buf: BytesMut::with_capacity(cap),
            }
        } else {
            WriteHalf::Direct
        }
    }

    pub(crate) fn write<T: Transport>(&mut self, inner: &mut T, src: &[u8]) -> io::Result<()> {
        match *self {
            WriteHalf::Framed { ref mut buf } => {
                buf.extend_from_slice(src);
                Ok(())
            }
            WriteHalf::Direct => inner.write(src),
        }
    }

    pub(crate) fn flush<T: Transport>(&mut self, inner: &mut T) -> io::Result<()> {
        let buf = match *self {
            WriteHalf::Framed { ref mut buf } => buf,
            WriteHalf::Direct => return inner.flush(),
        };

        if buf.len() > u32::MAX as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "frame payload does not fit the 4-byte length prefix",
            ));
        }

        trace!("flushing framed transport; len={}", buf.len());

        // Prefix and payload are handed to the inner transport as a single
        // write.
        let mut frame = BytesMut::with_capacity(FRAME_HEADER_LEN + buf.len());
        frame.put_u32(buf.len() as u32);
        frame.extend_from_slice(buf);

        inner.write(&frame)?;
        inner.flush()?;

        // Only a flush that made it onto the wire resets the buffer.
        buf.clear();
        Ok(())
    }
}
