//! bits/typed.rs
//! Fixed-width integer views over a `BitContainer`.
//!
//! Typed values are written and read most-significant bit first, so
//! `add_u16(v)` followed by `get_u16(start)` yields `v`. This differs from the
//! packed bulk appends (`add_packed_bytes`, `from_bytes`), which keep the
//! source buffer's LSB-first order. The two conventions are kept separate.
//!
//! A read that runs past `len()` zero-fills the missing high bits: the bits
//! that are present end up in the low positions of the result.

use crate::bits::types::{BitContainer, BitsError};

macro_rules! typed_bits {
    ($($add:ident, $get:ident, $t:ty, $ut:ty, $width:expr;)*) => {
        impl BitContainer {
            $(
                #[doc = concat!("Append a `", stringify!($t), "`, most significant bit first.")]
                #[inline]
                pub fn $add(&mut self, value: $t) {
                    self.append_msb_first(value as $ut as u64, $width);
                }

                #[doc = concat!("Read a `", stringify!($t), "` starting at `index`, zero-padding past the end.")]
                #[inline]
                pub fn $get(&self, index: usize) -> Result<$t, BitsError> {
                    Ok(self.read_msb_first(index, $width)? as $ut as $t)
                }
            )*
        }
    };
}

typed_bits! {
    add_u8,  get_u8,  u8,  u8,  8;
    add_i8,  get_i8,  i8,  u8,  8;
    add_u16, get_u16, u16, u16, 16;
    add_i16, get_i16, i16, u16, 16;
    add_u32, get_u32, u32, u32, 32;
    add_i32, get_i32, i32, u32, 32;
    add_u64, get_u64, u64, u64, 64;
    add_i64, get_i64, i64, u64, 64;
}
