use framed_transport::{FramedTransport, Transport};

use bytes::Bytes;

use std::cmp;
use std::collections::VecDeque;
use std::io;

macro_rules! mock {
    ($($x:expr,)*) => {{
        let mut v = VecDeque::new();
        v.extend(vec![$($x),*]);
        Mock { calls: v }
    }};
}

fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

#[test]
fn read_single_frame() {
    let mock = mock! {
        Ok(frame(b"abcdefghij")),
    };

    let mut framed = FramedTransport::new(mock);
    assert_eq!(&framed.read(10).unwrap()[..], b"abcdefghij");
    assert!(framed.get_ref().calls.is_empty());
}

#[test]
fn read_two_frames_in_order() {
    let mut wire = frame(b"ab");
    wire.extend_from_slice(&frame(b"cd"));
    let mock = mock! {
        Ok(wire),
    };

    let mut framed = FramedTransport::new(mock);
    assert_eq!(&framed.read(2).unwrap()[..], b"ab");
    assert_eq!(&framed.read(2).unwrap()[..], b"cd");
}

#[test]
fn read_spans_frame_boundaries() {
    let mock = mock! {
        Ok(frame(b"ab")),
        Ok(frame(b"cd")),
    };

    let mut framed = FramedTransport::new(mock);
    assert_eq!(&framed.read(4).unwrap()[..], b"abcd");
}

#[test]
fn read_zero_returns_empty_without_fetching() {
    let mock = mock! {
        Ok(frame(b"ab")),
    };

    let mut framed = FramedTransport::new(mock);
    assert!(framed.read(0).unwrap().is_empty());
    // The scripted frame is still on the wire, untouched.
    assert_eq!(framed.get_ref().calls.len(), 1);
}

#[test]
fn read_byte_crosses_frames() {
    let mock = mock! {
        Ok(frame(b"ab")),
        Ok(frame(b"c")),
    };

    let mut framed = FramedTransport::new(mock);
    assert_eq!(framed.read_byte().unwrap(), b'a');
    assert_eq!(framed.read_byte().unwrap(), b'b');
    assert_eq!(framed.read_byte().unwrap(), b'c');
}

#[test]
fn read_into_buffer_spans_frames() {
    let mock = mock! {
        Ok(frame(b"ab")),
        Ok(frame(b"cd")),
    };

    let mut framed = FramedTransport::new(mock);
    let mut dst = [0; 4];
    assert_eq!(framed.read_into_buffer(&mut dst).unwrap(), 4);
    assert_eq!(&dst, b"abcd");
    assert!(framed.get_ref().calls.is_empty());
}

#[test]
fn empty_frame_is_skipped() {
    let mock = mock! {
        Ok(frame(b"")),
        Ok(frame(b"ab")),
    };

    let mut framed = FramedTransport::new(mock);
    assert_eq!(&framed.read(2).unwrap()[..], b"ab");
}

#[test]
fn eof_mid_header() {
    let mock = mock! {
        Ok(b"\x00\x00".to_vec()),
    };

    let mut framed = FramedTransport::new(mock);
    let err = framed.read(1).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}

#[test]
fn eof_mid_payload() {
    // Header declares four payload bytes, only two arrive.
    let mock = mock! {
        Ok(b"\x00\x00\x00\x04ab".to_vec()),
    };

    let mut framed = FramedTransport::new(mock);
    let err = framed.read(4).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}

#[test]
fn inner_error_surfaces_verbatim() {
    let mock = mock! {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away")),
    };

    let mut framed = FramedTransport::new(mock);
    let err = framed.read(1).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
}

#[test]
fn passthrough_read_skips_framing() {
    let mock = mock! {
        Ok(b"abcd".to_vec()),
    };

    let mut framed = FramedTransport::with_framing(mock, false, true);
    assert_eq!(&framed.read(4).unwrap()[..], b"abcd");
}

#[test]
fn passthrough_read_byte_and_buffer() {
    let mock = mock! {
        Ok(b"abc".to_vec()),
    };

    let mut framed = FramedTransport::with_framing(mock, false, true);
    assert_eq!(framed.read_byte().unwrap(), b'a');
    let mut dst = [0; 2];
    assert_eq!(framed.read_into_buffer(&mut dst).unwrap(), 2);
    assert_eq!(&dst, b"bc");
}

// ===== Mock =====

struct Mock {
    calls: VecDeque<io::Result<Vec<u8>>>,
}

impl Transport for Mock {
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn is_open(&self) -> bool {
        true
    }

    fn read(&mut self, n: usize) -> io::Result<Bytes> {
        match self.calls.front_mut() {
            Some(Ok(data)) => {
                let take = cmp::min(n, data.len());
                let chunk: Vec<u8> = data.drain(..take).collect();
                if data.is_empty() {
                    self.calls.pop_front();
                }
                Ok(chunk.into())
            }
            Some(Err(_)) => match self.calls.pop_front() {
                Some(Err(e)) => Err(e),
                _ => unreachable!(),
            },
            None => Ok(Bytes::new()),
        }
    }

    fn write(&mut self, _: &[u8]) -> io::Result<()> {
        panic!("unexpected write");
    }

    fn flush(&mut self) -> io::Result<()> {
        panic!("unexpected flush");
    }
}
