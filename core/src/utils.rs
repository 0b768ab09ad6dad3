use std::fmt;
use num_enum::TryFromPrimitive;

/// Integer division rounding towards positive infinity.
#[inline]
pub const fn div_round_up(dividend: usize, divisor: usize) -> usize {
    dividend / divisor + (dividend % divisor != 0) as usize
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

pub fn fmt_bytes(b: &[u8]) -> String {
    if b.is_empty() {
        return "<empty>".to_string();
    }
    format!("0x{}", hex::encode(b))
}
