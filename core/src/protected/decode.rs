use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;

use crate::checksum::ChecksumAlg;
use crate::constants::PROTECTED_HEADER_LEN;
use crate::protected::types::{BlockError, ProtectedBlock};

/// Parse one block from the front of `wire`, returning it and the bytes consumed.
///
/// Payloads up to `u16::MAX` are accepted even though construction caps them
/// at 32 KiB.
pub fn parse_block(wire: &[u8]) -> Result<(ProtectedBlock, usize), BlockError> {
    if wire.len() < PROTECTED_HEADER_LEN {
        return Err(BlockError::Truncated {
            have: wire.len(),
            need: PROTECTED_HEADER_LEN,
        });
    }

    let alg = ChecksumAlg::from_u8(wire[0])?;
    let len = LittleEndian::read_u16(&wire[1..3]) as usize;
    let code_len = alg.code_len();

    let need = PROTECTED_HEADER_LEN + len + code_len;
    if wire.len() < need {
        return Err(BlockError::Truncated { have: wire.len(), need });
    }

    let payload_end = PROTECTED_HEADER_LEN + len;
    let payload = Bytes::copy_from_slice(&wire[PROTECTED_HEADER_LEN..payload_end]);
    let code = wire[payload_end..need].to_vec();

    Ok((ProtectedBlock::from_parts(alg, payload, code), need))
}

/// Decode exactly one block. Trailing bytes are rejected.
pub fn decode_block(wire: &[u8]) -> Result<ProtectedBlock, BlockError> {
    let (block, used) = parse_block(wire)?;
    if used != wire.len() {
        return Err(BlockError::LengthMismatch {
            expected: used,
            actual: wire.len(),
        });
    }
    Ok(block)
}

/// Decode back-to-back blocks until `wire` is exhausted.
pub fn decode_sequence(wire: &[u8]) -> Result<Vec<ProtectedBlock>, BlockError> {
    let mut out = Vec::new();
    let mut off = 0;
    while off < wire.len() {
        let (block, used) = parse_block(&wire[off..])?;
        off += used;
        out.push(block);
    }
    Ok(out)
}

impl ProtectedBlock {
    pub fn decode(wire: &[u8]) -> Result<Self, BlockError> {
        decode_block(wire)
    }

    pub fn deserialize(wire: &[u8]) -> Result<Self, BlockError> {
        decode_block(wire)
    }

    pub fn deserialize_sequence(wire: &[u8]) -> Result<Vec<Self>, BlockError> {
        decode_sequence(wire)
    }
}
