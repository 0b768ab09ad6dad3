//! transport/mod.rs
//! Fixed-size block framing over a byte stream.
//!
//! Responsibilities:
//! - Split a message into equal-size blocks with a `(remaining, data_len)` header
//! - Reassemble whole blocks on the receive side, with header sanity checks
//! - Adapt files, cursors, writers and TCP sockets behind `BlockStream`
//!
//! Non-responsibilities:
//! - Integrity (see `protected`)
//! - Retransmission

pub mod types;
pub mod stream;
pub mod encode;
pub mod decode;
pub mod client;

pub use types::{
    check_block_size,
    BlockHeader,
    ReceiveOutcome,
    StreamCaps,
    TransportError,
    TransportOptions,
};
pub use stream::{BlockStream, SeekableStream, SocketStream, WriteStream};
pub use encode::{send, send_with};
pub use decode::{check_header, receive, receive_synced, receive_with, ReceiveSync};
pub use client::FramedClient;
