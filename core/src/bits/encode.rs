//! bits/encode.rs
//!
//! Layout:
//!
//! ```text
//! [ count (4, i32 LE) ]
//! [ word_0 (4, u32 LE) ] ... [ word_{n-1} ]   n = ceil(count / 32)
//! ```
//!
//! Bits past `count` in the final word are written as zero.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::bits::types::{BitContainer, BitsError};
use crate::constants::{BITS_COUNT_PREFIX_LEN, WORD_BITS, WORD_BYTES};
use crate::utils::div_round_up;

pub fn encode_bits(bits: &BitContainer) -> Result<Vec<u8>, BitsError> {
    let count = bits.len();
    if count > i32::MAX as usize {
        return Err(BitsError::CountOverflow { count });
    }

    let n_words = div_round_up(count, WORD_BITS);
    let mut out = Vec::with_capacity(BITS_COUNT_PREFIX_LEN + n_words * WORD_BYTES);

    // Writes into a Vec cannot fail.
    out.write_i32::<LittleEndian>(count as i32).unwrap();

    let words = &bits.words()[..n_words];
    let tail_bits = count % WORD_BITS;
    for (i, &word) in words.iter().enumerate() {
        let word = if i + 1 == n_words && tail_bits != 0 {
            word & ((1u32 << tail_bits) - 1)
        } else {
            word
        };
        out.write_u32::<LittleEndian>(word).unwrap();
    }

    debug_assert_eq!(out.len(), BITS_COUNT_PREFIX_LEN + n_words * WORD_BYTES);
    Ok(out)
}

impl BitContainer {
    /// Serialize into the `count + words` wire form.
    pub fn serialize(&self) -> Result<Vec<u8>, BitsError> {
        encode_bits(self)
    }
}
