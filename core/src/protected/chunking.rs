//! Splitting a payload into protected blocks and putting it back together.

use bytes::{Bytes, BytesMut};

use crate::checksum::ChecksumAlg;
use crate::constants::MAX_PROTECTED_PAYLOAD;
use crate::protected::decode::decode_sequence;
use crate::protected::encode::encode_block_into;
use crate::protected::types::{BlockError, ProtectedBlock};
use crate::utils::div_round_up;

/// Split `payload` into consecutive blocks of at most `max_block_bytes`.
///
/// Every block but the last carries exactly `max_block_bytes`.
pub fn protect(
    payload: &[u8],
    alg: ChecksumAlg,
    max_block_bytes: usize,
) -> Result<Vec<ProtectedBlock>, BlockError> {
    if max_block_bytes == 0 || max_block_bytes > MAX_PROTECTED_PAYLOAD {
        return Err(BlockError::InvalidChunkSize { size: max_block_bytes });
    }

    let shared = Bytes::copy_from_slice(payload);
    let mut blocks = Vec::with_capacity(div_round_up(payload.len(), max_block_bytes));
    let mut start = 0;
    while start < shared.len() {
        let end = (start + max_block_bytes).min(shared.len());
        blocks.push(ProtectedBlock::new(alg, shared.slice(start..end))?);
        start = end;
    }
    Ok(blocks)
}

/// `protect`, then the blocks' wire forms concatenated.
pub fn protect_to_bytes(
    payload: &[u8],
    alg: ChecksumAlg,
    max_block_bytes: usize,
) -> Result<Vec<u8>, BlockError> {
    let blocks = protect(payload, alg, max_block_bytes)?;
    let total = blocks.iter().map(ProtectedBlock::encoded_len).sum();
    let mut out = Vec::with_capacity(total);
    for block in &blocks {
        encode_block_into(block, &mut out)?;
    }
    Ok(out)
}

/// Indices of blocks whose code no longer matches their payload.
pub fn corrupted_indices(blocks: &[ProtectedBlock]) -> Vec<usize> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.validate())
        .map(|(i, _)| i)
        .collect()
}

/// Concatenate payloads, stopping at the first block that fails validation.
pub fn reassemble(blocks: &[ProtectedBlock]) -> Result<Bytes, BlockError> {
    let total = blocks.iter().map(|b| b.payload().len()).sum();
    let mut out = BytesMut::with_capacity(total);
    for (index, block) in blocks.iter().enumerate() {
        if !block.validate() {
            return Err(BlockError::IntegrityFailure { index });
        }
        out.extend_from_slice(block.payload());
    }
    Ok(out.freeze())
}

/// Inverse of `protect_to_bytes`.
pub fn unprotect(wire: &[u8]) -> Result<Bytes, BlockError> {
    let blocks = decode_sequence(wire)?;
    reassemble(&blocks)
}
