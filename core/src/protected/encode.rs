use byteorder::{LittleEndian, WriteBytesExt};

use crate::protected::types::{BlockError, ProtectedBlock};

/// Encode one protected block.
///
/// Layout:
///
/// ```text
/// [ alg (1) ]
/// [ len (2) ]
/// [ payload (len) ]
/// [ code (code_len(alg)) ]
/// ```
pub fn encode_block(block: &ProtectedBlock) -> Result<Vec<u8>, BlockError> {
    let mut out = Vec::with_capacity(block.encoded_len());
    encode_block_into(block, &mut out)?;
    Ok(out)
}

/// Append the wire form of `block` to `out`.
pub fn encode_block_into(block: &ProtectedBlock, out: &mut Vec<u8>) -> Result<(), BlockError> {
    let len = u16::try_from(block.payload().len()).map_err(|_| BlockError::PayloadTooLarge {
        len: block.payload().len(),
        max: u16::MAX as usize,
    })?;
    let start = out.len();

    // Writes into a Vec cannot fail.
    out.push(block.alg().to_u8());
    out.write_u16::<LittleEndian>(len).unwrap();
    out.extend_from_slice(block.payload());
    out.extend_from_slice(block.code());

    let written = out.len() - start;
    if written != block.encoded_len() {
        return Err(BlockError::LengthMismatch {
            expected: block.encoded_len(),
            actual: written,
        });
    }
    Ok(())
}

impl ProtectedBlock {
    pub fn encode(&self) -> Result<Vec<u8>, BlockError> {
        encode_block(self)
    }

    /// Alias of [`ProtectedBlock::encode`].
    pub fn serialize(&self) -> Result<Vec<u8>, BlockError> {
        encode_block(self)
    }
}
