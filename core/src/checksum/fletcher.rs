//! Fletcher checksums (running sum of sums, two halves packed).
//!
//! - Fletcher-16 folds bytes modulo 255: `(sum2 << 8) | sum1`
//! - Fletcher-32 folds little-endian 16-bit words modulo 65535: `(sum2 << 16) | sum1`.
//!   An odd trailing byte is treated as a word with a zero high byte.

/// Bytes folded before a modulo reduction in `fletcher16`.
/// 5802 is the largest n for which the sums stay below 2^32.
const F16_BLOCK: usize = 5802;
/// Words folded before a modulo reduction in `fletcher32`.
/// 359 is the largest n for which the sums stay below 2^32.
const F32_BLOCK: usize = 359;

pub fn fletcher16(data: &[u8]) -> u16 {
    let mut sum1: u32 = 0;
    let mut sum2: u32 = 0;

    for block in data.chunks(F16_BLOCK) {
        for &b in block {
            sum1 += b as u32;
            sum2 += sum1;
        }
        sum1 %= 255;
        sum2 %= 255;
    }

    ((sum2 << 8) | sum1) as u16
}

pub fn fletcher32(data: &[u8]) -> u32 {
    let mut sum1: u32 = 0;
    let mut sum2: u32 = 0;

    for block in data.chunks(F32_BLOCK * 2) {
        for pair in block.chunks(2) {
            let hi = pair.get(1).copied().unwrap_or(0);
            let word = u16::from_le_bytes([pair[0], hi]);
            sum1 += word as u32;
            sum2 += sum1;
        }
        sum1 %= 65535;
        sum2 %= 65535;
    }

    (sum2 << 16) | sum1
}
