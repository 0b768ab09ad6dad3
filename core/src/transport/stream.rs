//! Stream adapters for the block transport.
//!
//! The transport only ever moves whole blocks, so each adapter answers two
//! questions: how many bytes could be read right now, and how to move exactly
//! one block.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::transport::types::StreamCaps;

/// Read timeout used while peeking a socket for availability.
const PEEK_TIMEOUT: Duration = Duration::from_millis(1);

pub trait BlockStream {
    fn caps(&self) -> StreamCaps;

    /// Bytes that can be read without blocking, looking at most `want` ahead.
    ///
    /// `Ok(None)` means the peer has closed the stream.
    fn available(&mut self, want: usize) -> io::Result<Option<usize>>;

    /// Fill `buf` completely.
    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<()>;

    fn write_block(&mut self, block: &[u8]) -> io::Result<()>;

    fn flush_block(&mut self) -> io::Result<()>;
}

impl<T: BlockStream + ?Sized> BlockStream for &mut T {
    fn caps(&self) -> StreamCaps {
        (**self).caps()
    }

    fn available(&mut self, want: usize) -> io::Result<Option<usize>> {
        (**self).available(want)
    }

    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_block(buf)
    }

    fn write_block(&mut self, block: &[u8]) -> io::Result<()> {
        (**self).write_block(block)
    }

    fn flush_block(&mut self) -> io::Result<()> {
        (**self).flush_block()
    }
}

// ---------------------------------------------------------------------------
// Seekable (files, cursors)
// ---------------------------------------------------------------------------

/// A positioned stream; availability is `len - position`.
#[derive(Debug)]
pub struct SeekableStream<S> {
    inner: S,
}

impl<S: Read + Write + Seek> SeekableStream<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Read + Write + Seek> BlockStream for SeekableStream<S> {
    fn caps(&self) -> StreamCaps {
        StreamCaps::READABLE | StreamCaps::WRITABLE | StreamCaps::SEEKABLE
    }

    fn available(&mut self, _want: usize) -> io::Result<Option<usize>> {
        let pos = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(Some(end.saturating_sub(pos) as usize))
    }

    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)
    }

    fn write_block(&mut self, block: &[u8]) -> io::Result<()> {
        self.inner.write_all(block)
    }

    fn flush_block(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Write-only
// ---------------------------------------------------------------------------

/// Send side only, e.g. `BufWriter<File>`.
#[derive(Debug)]
pub struct WriteStream<W> {
    inner: W,
}

impl<W: Write> WriteStream<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> BlockStream for WriteStream<W> {
    fn caps(&self) -> StreamCaps {
        StreamCaps::WRITABLE
    }

    fn available(&mut self, _want: usize) -> io::Result<Option<usize>> {
        Ok(Some(0))
    }

    fn read_block(&mut self, _buf: &mut [u8]) -> io::Result<()> {
        Err(io::Error::new(ErrorKind::Unsupported, "write-only stream"))
    }

    fn write_block(&mut self, block: &[u8]) -> io::Result<()> {
        self.inner.write_all(block)
    }

    fn flush_block(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// TCP
// ---------------------------------------------------------------------------

/// A connected TCP socket.
///
/// Availability is measured by peeking the receive buffer with a short read
/// timeout, which only touches the read half. A clone of the same socket may
/// keep writing from another thread.
///
/// The read timeout is set once, on the first `available`, and stays at
/// `PEEK_TIMEOUT`. `read_block` is only called once a whole block is
/// buffered, so it never waits on it. `into_inner` restores a blocking read.
#[derive(Debug)]
pub struct SocketStream {
    inner: TcpStream,
    peek_buf: Vec<u8>,
    peek_armed: bool,
}

impl SocketStream {
    pub fn new(inner: TcpStream) -> Self {
        Self { inner, peek_buf: Vec::new(), peek_armed: false }
    }

    pub fn get_ref(&self) -> &TcpStream {
        &self.inner
    }

    pub fn try_clone(&self) -> io::Result<Self> {
        Ok(Self::new(self.inner.try_clone()?))
    }

    pub fn shutdown(&self) -> io::Result<()> {
        match self.inner.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    pub fn into_inner(self) -> io::Result<TcpStream> {
        if self.peek_armed {
            self.inner.set_read_timeout(None)?;
        }
        Ok(self.inner)
    }
}

impl BlockStream for SocketStream {
    fn caps(&self) -> StreamCaps {
        StreamCaps::READABLE | StreamCaps::WRITABLE | StreamCaps::SOCKET
    }

    fn available(&mut self, want: usize) -> io::Result<Option<usize>> {
        let want = want.max(1);
        if self.peek_buf.len() < want {
            self.peek_buf.resize(want, 0);
        }

        if !self.peek_armed {
            self.inner.set_read_timeout(Some(PEEK_TIMEOUT))?;
            self.peek_armed = true;
        }

        match self.inner.peek(&mut self.peek_buf[..want]) {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(n)),
            Err(e) => match e.kind() {
                ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => Ok(Some(0)),
                ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::NotConnected => Ok(None),
                _ => Err(e),
            },
        }
    }

    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)
    }

    fn write_block(&mut self, block: &[u8]) -> io::Result<()> {
        self.inner.write_all(block)
    }

    fn flush_block(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
