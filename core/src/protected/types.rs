use std::fmt;
use bytes::Bytes;

use crate::checksum::{self, ChecksumAlg, ChecksumError};
use crate::constants::{MAX_PROTECTED_PAYLOAD, PROTECTED_HEADER_LEN};
use crate::utils::fmt_bytes;

/// A payload bound to its integrity code.
///
/// Immutable once built: `code` always corresponds to `payload` under `alg`
/// unless the block came off the wire, in which case `validate()` reports
/// whether it still does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBlock {
    alg: ChecksumAlg,
    payload: Bytes,
    code: Vec<u8>,
}

impl ProtectedBlock {
    /// Build a block and compute its code.
    ///
    /// Fails with `PayloadTooLarge` above 32 KiB.
    pub fn new(alg: ChecksumAlg, payload: impl Into<Bytes>) -> Result<Self, BlockError> {
        let payload = payload.into();
        if payload.len() > MAX_PROTECTED_PAYLOAD {
            return Err(BlockError::PayloadTooLarge {
                len: payload.len(),
                max: MAX_PROTECTED_PAYLOAD,
            });
        }
        let code = checksum::compute(alg, &payload);
        Ok(Self { alg, payload, code })
    }

    /// Assemble a block from decoded parts without recomputing the code.
    pub(crate) fn from_parts(alg: ChecksumAlg, payload: Bytes, code: Vec<u8>) -> Self {
        debug_assert_eq!(code.len(), alg.code_len());
        Self { alg, payload, code }
    }

    #[inline]
    pub fn alg(&self) -> ChecksumAlg {
        self.alg
    }

    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    #[inline]
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Bytes this block occupies on the wire.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        PROTECTED_HEADER_LEN + self.payload.len() + self.code.len()
    }

    /// Recompute the code over the payload and compare.
    pub fn validate(&self) -> bool {
        checksum::verify(self.alg, &self.payload, &self.code)
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    pub fn summary(&self) -> String {
        format!(
            "ProtectedBlock {{ alg: {}, len: {}, code: {} }}",
            self.alg,
            self.payload.len(),
            fmt_bytes(&self.code),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    PayloadTooLarge { len: usize, max: usize },
    InvalidChunkSize { size: usize },
    Truncated { have: usize, need: usize },
    LengthMismatch { expected: usize, actual: usize },
    UnknownAlgorithm(ChecksumError),
    IntegrityFailure { index: usize },
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BlockError::*;
        match self {
            PayloadTooLarge { len, max } =>
                write!(f, "payload too large: {} bytes (max {})", len, max),
            InvalidChunkSize { size } =>
                write!(f, "invalid chunk size: {} (expected 1..={})", size, MAX_PROTECTED_PAYLOAD),
            Truncated { have, need } =>
                write!(f, "truncated block: have {} bytes, need {}", have, need),
            LengthMismatch { expected, actual } =>
                write!(f, "length mismatch: expected {}, got {}", expected, actual),
            UnknownAlgorithm(e) =>
                write!(f, "{}", e),
            IntegrityFailure { index } =>
                write!(f, "integrity check failed for block {}", index),
        }
    }
}

impl std::error::Error for BlockError {}

impl From<ChecksumError> for BlockError {
    fn from(e: ChecksumError) -> Self {
        BlockError::UnknownAlgorithm(e)
    }
}
