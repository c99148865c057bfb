use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use bytes::Bytes;
use log::debug;

use crate::Transport;

/// A blocking transport over a TCP stream.
///
/// [`open`](Transport::open) establishes the connection and
/// [`close`](Transport::close) shuts it down; the data operations fail with
/// [`NotConnected`](io::ErrorKind::NotConnected) until the transport is
/// open. Timeouts and keep-alive belong to the socket and can be configured
/// through [`stream`](TcpTransport::stream).
#[derive(Debug)]
pub struct TcpTransport {
    addr: String,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Creates a transport that will connect to `addr` when opened.
    pub fn new<A: Into<String>>(addr: A) -> TcpTransport {
        TcpTransport {
            addr: addr.into(),
            stream: None,
        }
    }

    /// Wraps an already-connected stream, for the accepting side.
    pub fn from_stream(stream: TcpStream) -> TcpTransport {
        let addr = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_default();
        TcpTransport {
            addr,
            stream: Some(stream),
        }
    }

    /// Returns the connected stream, or `None` while the transport is
    /// closed.
    pub fn stream(&mut self) -> Option<&mut TcpStream> {
        self.stream.as_mut()
    }

    fn connected(&mut self) -> io::Result<&mut TcpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "transport is not open"))
    }
}

impl Transport for TcpTransport {
    fn open(&mut self) -> io::Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        debug!("connecting to {}", self.addr);
        let addrs = self.addr.to_socket_addrs()?;
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect(addr) {
                Ok(stream) => {
                    self.stream = Some(stream);
                    return Ok(());
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
        }))
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(stream) = self.stream.take() {
            debug!("closing connection to {}", self.addr);
            stream.shutdown(Shutdown::Both)?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn read(&mut self, n: usize) -> io::Result<Bytes> {
        let stream = self.connected()?;
        let mut buf = vec![0; n];
        let read = stream.read(&mut buf)?;
        buf.truncate(read);
        Ok(buf.into())
    }

    fn read_exactly(&mut self, n: usize) -> io::Result<Bytes> {
        let stream = self.connected()?;
        let mut buf = vec![0; n];
        stream.read_exact(&mut buf)?;
        Ok(buf.into())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.connected()?.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.connected()?.flush()
    }
}
