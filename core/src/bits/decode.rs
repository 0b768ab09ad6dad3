//! bits/decode.rs
//!
//! Inverse of `encode_bits`. The word payload must be exactly
//! `ceil(count / 32)` words; anything else is rejected rather than guessed at.

use byteorder::{ByteOrder, LittleEndian};

use crate::bits::types::{BitContainer, BitsError};
use crate::constants::{BITS_COUNT_PREFIX_LEN, WORD_BITS, WORD_BYTES};
use crate::utils::div_round_up;

pub fn decode_bits(buf: &[u8]) -> Result<BitContainer, BitsError> {
    if buf.len() < BITS_COUNT_PREFIX_LEN {
        return Err(BitsError::Truncated { have: buf.len(), need: BITS_COUNT_PREFIX_LEN });
    }

    let raw_count = LittleEndian::read_i32(&buf[..BITS_COUNT_PREFIX_LEN]);
    if raw_count < 0 {
        return Err(BitsError::NegativeCount(raw_count));
    }
    let count = raw_count as usize;

    let n_words = div_round_up(count, WORD_BITS);
    let expected = BITS_COUNT_PREFIX_LEN + n_words * WORD_BYTES;
    if buf.len() < expected {
        return Err(BitsError::Truncated { have: buf.len(), need: expected });
    }
    if buf.len() != expected {
        return Err(BitsError::LengthMismatch { expected, actual: buf.len() });
    }

    let mut words = vec![0u32; n_words];
    LittleEndian::read_u32_into(&buf[BITS_COUNT_PREFIX_LEN..], &mut words);

    Ok(BitContainer::from_raw_parts(words, count))
}

impl BitContainer {
    /// Rebuild a container from its wire form.
    pub fn deserialize(buf: &[u8]) -> Result<BitContainer, BitsError> {
        decode_bits(buf)
    }
}
