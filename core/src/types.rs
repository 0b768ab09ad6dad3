use std::io;
use thiserror::Error;

use crate::{
    bits::BitsError,
    checksum::ChecksumError,
    config::ConfigError,
    protected::BlockError,
    transport::TransportError,
};

/// Unified error covering every layer of the crate.
/// - `From<T>` impls let `?` cross module boundaries.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("bits error: {0}")]
    Bits(#[from] BitsError),

    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),

    #[error("block error: {0}")]
    Block(#[from] BlockError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
