use std::fmt;
use std::io;
use std::time::Duration;
use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;

use crate::constants::{
    BLOCK_HEADER_LEN, DEFAULT_MAX_MESSAGE_BYTES, DEFAULT_POLL_INTERVAL, DEFAULT_RECEIVE_TIMEOUT,
    MIN_BLOCK_SIZE_EXCLUSIVE,
};

bitflags::bitflags! {
    /// What a `BlockStream` can do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StreamCaps: u8 {
        const READABLE = 0b0000_0001;
        const WRITABLE = 0b0000_0010;
        /// Availability is known from position and length.
        const SEEKABLE = 0b0000_0100;
        /// Availability is known from the socket receive buffer.
        const SOCKET   = 0b0000_1000;
    }
}

/// Fixed header at the front of every transport block.
///
/// All fields are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Blocks still to follow this one; 0 marks the final block.
    pub remaining: u32,
    /// Meaningful bytes after the header; the rest of the block is padding.
    pub data_len: u32,
}

impl BlockHeader {
    pub const LEN: usize = 4  // remaining
        + 4;                 // data_len

    pub fn to_le_bytes(&self) -> [u8; BLOCK_HEADER_LEN] {
        let mut out = [0u8; BLOCK_HEADER_LEN];
        self.write_to(&mut out);
        out
    }

    /// Write into the first `LEN` bytes of `buf`.
    pub fn write_to(&self, buf: &mut [u8]) {
        LittleEndian::write_u32(&mut buf[0..4], self.remaining);
        LittleEndian::write_u32(&mut buf[4..8], self.data_len);
    }

    pub fn parse(buf: &[u8]) -> Result<Self, TransportError> {
        if buf.len() < Self::LEN {
            return Err(TransportError::ShortBlock { have: buf.len() });
        }
        Ok(Self {
            remaining: LittleEndian::read_u32(&buf[0..4]),
            data_len: LittleEndian::read_u32(&buf[4..8]),
        })
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.remaining == 0
    }
}

/// Tunables for `send_with` / `receive_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    /// Sleep between availability checks.
    pub poll_interval: Duration,
    /// Reject messages whose first header announces more than this.
    pub max_message_bytes: usize,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            timeout: Some(DEFAULT_RECEIVE_TIMEOUT),
        }
    }
}

/// Result of a receive that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveOutcome {
    Message(Bytes),
    /// The deadline passed before the final block arrived.
    TimedOut,
    /// The caller's stop condition fired while waiting for a block.
    Cancelled,
    /// The peer closed the connection.
    Disconnected,
}

impl ReceiveOutcome {
    pub fn is_message(&self) -> bool {
        matches!(self, ReceiveOutcome::Message(_))
    }

    pub fn into_message(self) -> Option<Bytes> {
        match self {
            ReceiveOutcome::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// Reject block sizes the header cannot describe.
pub fn check_block_size(block_size: usize) -> Result<(), TransportError> {
    if block_size <= MIN_BLOCK_SIZE_EXCLUSIVE {
        return Err(TransportError::BlockSizeTooSmall { size: block_size });
    }
    if block_size > u32::MAX as usize {
        return Err(TransportError::BlockSizeTooLarge { size: block_size });
    }
    Ok(())
}

#[derive(Debug)]
pub enum TransportError {
    EmptyPayload,
    BlockSizeTooSmall { size: usize },
    BlockSizeTooLarge { size: usize },
    NotWritable,
    NotReadable,
    NotSeekable,
    TooManyBlocks { blocks: usize },
    ShortBlock { have: usize },
    DataLenOutOfRange { data_len: u32, max: usize },
    EmptyBlock,
    ShortIntermediateBlock { data_len: u32, expected: usize },
    SequenceBroken { expected: u32, actual: u32 },
    MessageTooLarge { announced: u64, max: usize },
    Disconnected,
    AlreadyListening,
    Io(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TransportError::*;
        match self {
            EmptyPayload =>
                write!(f, "payload is empty"),
            BlockSizeTooSmall { size } =>
                write!(f, "block size {} must be greater than {}", size, MIN_BLOCK_SIZE_EXCLUSIVE),
            BlockSizeTooLarge { size } =>
                write!(f, "block size {} does not fit in u32", size),
            NotWritable =>
                write!(f, "stream is not writable"),
            NotReadable =>
                write!(f, "stream is not readable"),
            NotSeekable =>
                write!(f, "stream cannot report available bytes"),
            TooManyBlocks { blocks } =>
                write!(f, "message needs {} blocks (max {})", blocks, u32::MAX),
            ShortBlock { have } =>
                write!(f, "block shorter than header: {} bytes", have),
            DataLenOutOfRange { data_len, max } =>
                write!(f, "data_len {} exceeds block capacity {}", data_len, max),
            EmptyBlock =>
                write!(f, "block carries no data"),
            ShortIntermediateBlock { data_len, expected } =>
                write!(f, "non-final block carries {} bytes, expected {}", data_len, expected),
            SequenceBroken { expected, actual } =>
                write!(f, "block sequence broken: expected remaining {}, got {}", expected, actual),
            MessageTooLarge { announced, max } =>
                write!(f, "message announces at least {} bytes (max {})", announced, max),
            Disconnected =>
                write!(f, "peer disconnected"),
            AlreadyListening =>
                write!(f, "listener already running"),
            Io(e) =>
                write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        TransportError::Io(e)
    }
}
