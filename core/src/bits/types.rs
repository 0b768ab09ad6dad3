//! bits/types.rs
//! Growable container of individual bits packed into 32-bit words.
//!
//! Layout:
//! - bit `i` lives in word `i / WORD_BITS`, at bit position `i % WORD_BITS` (LSB = 0)
//! - `capacity()` is always a whole number of words
//! - bits past `len()` are unspecified until written; every read is bounded by `len()`
//!
//! Growth keeps the logical capacity at the exact word count that covers `len()`,
//! while the backing `Vec` amortizes reallocations.

use std::fmt;

use crate::constants::WORD_BITS;
use crate::utils::div_round_up;

#[derive(Clone, Default)]
pub struct BitContainer {
    words: Vec<u32>,
    count: usize,
}

impl BitContainer {
    /// Empty container with no backing storage.
    pub fn new() -> Self {
        Self { words: Vec::new(), count: 0 }
    }

    /// Empty container able to hold at least `bits` without growing.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: vec![0; div_round_up(bits, WORD_BITS)],
            count: 0,
        }
    }

    pub fn from_bools(source: &[bool]) -> Self {
        let mut bits = Self::with_capacity(source.len());
        bits.count = source.len();
        for (i, &b) in source.iter().enumerate() {
            bits.fast_set(i, b);
        }
        bits
    }

    /// Every bit of `source`, LSB-first within each byte.
    pub fn from_bytes(source: &[u8]) -> Self {
        let mut bits = Self::new();
        bits.append_packed(source.len() * 8, |i| source[i / 8] & (1 << (i % 8)) != 0);
        bits
    }

    /// Every bit of `source`; the words become the backing storage verbatim.
    pub fn from_words(source: &[u32]) -> Self {
        Self {
            words: source.to_vec(),
            count: source.len() * WORD_BITS,
        }
    }

    /// Rebuild from raw parts. `words` must cover `count`.
    pub(crate) fn from_raw_parts(words: Vec<u32>, count: usize) -> Self {
        debug_assert!(words.len() * WORD_BITS >= count);
        Self { words, count }
    }

    // ---------------------------------------------------------------------
    // Size
    // ---------------------------------------------------------------------

    /// Number of bits in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bits the backing storage can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Backing words, including any stale bits past `len()`.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Ensure room for at least `bits` bits.
    pub fn set_min_capacity(&mut self, bits: usize) {
        self.ensure_capacity(bits);
    }

    /// Drop backing words not needed to cover `len()`.
    pub fn trim(&mut self) {
        self.words.truncate(div_round_up(self.count, WORD_BITS));
        self.words.shrink_to_fit();
    }

    // ---------------------------------------------------------------------
    // Element access
    // ---------------------------------------------------------------------

    pub fn get(&self, index: usize) -> Result<bool, BitsError> {
        self.check_index(index)?;
        Ok(self.fast_get(index))
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<(), BitsError> {
        self.check_index(index)?;
        self.fast_set(index, value);
        Ok(())
    }

    /// Read without checking `index < len()`.
    ///
    /// Callers must have verified bounds. Indices between `len()` and
    /// `capacity()` return stale storage; indices past `capacity()` panic.
    #[inline]
    pub fn fast_get(&self, index: usize) -> bool {
        self.words[index / WORD_BITS] & (1u32 << (index % WORD_BITS)) != 0
    }

    /// Write without checking `index < len()`. Same contract as [`Self::fast_get`].
    #[inline]
    pub fn fast_set(&mut self, index: usize, value: bool) {
        let word = &mut self.words[index / WORD_BITS];
        let mask = 1u32 << (index % WORD_BITS);
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.count).map(move |i| self.fast_get(i))
    }

    // ---------------------------------------------------------------------
    // Appends
    // ---------------------------------------------------------------------

    pub fn add(&mut self, value: bool) {
        self.count += 1;
        self.ensure_capacity(self.count);
        self.fast_set(self.count - 1, value);
    }

    pub fn add_range(&mut self, values: &[bool]) {
        self.append_packed(values.len(), |i| values[i]);
    }

    /// Append the first `count` bits of `values`, LSB-first within each byte.
    pub fn add_packed_bytes(&mut self, values: &[u8], count: usize) -> Result<(), BitsError> {
        let available = values.len() * 8;
        if count > available {
            return Err(BitsError::OutOfRange { index: count, len: available });
        }
        self.append_packed(count, |i| values[i / 8] & (1 << (i % 8)) != 0);
        Ok(())
    }

    /// Append the first `count` bits of `values`, LSB-first within each word.
    pub fn add_packed_words(&mut self, values: &[u32], count: usize) -> Result<(), BitsError> {
        let available = values.len() * WORD_BITS;
        if count > available {
            return Err(BitsError::OutOfRange { index: count, len: available });
        }
        self.append_packed(count, |i| values[i / WORD_BITS] & (1u32 << (i % WORD_BITS)) != 0);
        Ok(())
    }

    /// Append `width` bits of `value`, most significant first.
    pub(crate) fn append_msb_first(&mut self, value: u64, width: usize) {
        debug_assert!(width <= 64);
        let start = self.count;
        self.count += width;
        self.ensure_capacity(self.count);
        for i in 0..width {
            self.fast_set(start + i, (value >> (width - 1 - i)) & 1 == 1);
        }
    }

    /// Read up to `width` bits from `index`, most significant first.
    /// Bits past `len()` are treated as missing high bits (zero).
    pub(crate) fn read_msb_first(&self, index: usize, width: usize) -> Result<u64, BitsError> {
        debug_assert!(width <= 64);
        self.check_index(index)?;
        let available = (self.count - index).min(width);
        let mut value = 0u64;
        for i in 0..available {
            value = (value << 1) | self.fast_get(index + i) as u64;
        }
        Ok(value)
    }

    fn append_packed(&mut self, count: usize, bit_at: impl Fn(usize) -> bool) {
        let start = self.count;
        self.count += count;
        self.ensure_capacity(self.count);
        for i in 0..count {
            self.fast_set(start + i, bit_at(i));
        }
    }

    // ---------------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------------

    pub fn pop(&mut self) -> Result<bool, BitsError> {
        if self.count == 0 {
            return Err(BitsError::InvalidOperation("pop on empty container"));
        }
        self.count -= 1;
        Ok(self.fast_get(self.count))
    }

    /// Remove the last `n` bits.
    pub fn pop_n(&mut self, n: usize) -> Result<(), BitsError> {
        if n > self.count {
            return Err(BitsError::InvalidOperation("pop past start of container"));
        }
        self.count -= n;
        Ok(())
    }

    pub fn pop_and_trim(&mut self, n: usize) -> Result<(), BitsError> {
        self.pop_n(n)?;
        self.trim();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    pub fn clear_and_trim(&mut self) {
        self.count = 0;
        self.trim();
    }

    /// Keep only the first `final_count` bits.
    pub fn truncate(&mut self, final_count: usize) -> Result<(), BitsError> {
        if final_count > self.count {
            return Err(BitsError::OutOfRange { index: final_count, len: self.count });
        }
        self.count = final_count;
        Ok(())
    }

    pub fn truncate_and_trim(&mut self, final_count: usize) -> Result<(), BitsError> {
        self.truncate(final_count)?;
        self.trim();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    #[inline]
    fn check_index(&self, index: usize) -> Result<(), BitsError> {
        if index >= self.count {
            return Err(BitsError::OutOfRange { index, len: self.count });
        }
        Ok(())
    }

    fn ensure_capacity(&mut self, bits: usize) {
        let needed = div_round_up(bits, WORD_BITS);
        if self.words.len() < needed {
            // Vec::resize reserves geometrically, so repeated single-bit
            // appends stay amortized O(1).
            self.words.resize(needed, 0);
        }
    }
}

impl PartialEq for BitContainer {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.iter().eq(other.iter())
    }
}

impl Eq for BitContainer {}

impl fmt::Debug for BitContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHOWN: usize = 64;
        let mut bits: String = self
            .iter()
            .take(SHOWN)
            .map(|b| if b { '1' } else { '0' })
            .collect();
        if self.count > SHOWN {
            bits.push_str("...");
        }
        f.debug_struct("BitContainer")
            .field("len", &self.count)
            .field("capacity", &self.capacity())
            .field("bits", &bits)
            .finish()
    }
}

impl FromIterator<bool> for BitContainer {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitContainer::new();
        bits.extend(iter);
        bits
    }
}

impl Extend<bool> for BitContainer {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.ensure_capacity(self.count + iter.size_hint().0);
        for b in iter {
            self.add(b);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitsError {
    /// Index (or requested bit count) outside the valid range.
    OutOfRange { index: usize, len: usize },

    /// Operation not valid in the current state (e.g. pop on empty).
    InvalidOperation(&'static str),

    /// Serialized buffer shorter than required.
    Truncated { have: usize, need: usize },

    /// Serialized word payload does not match the declared count.
    LengthMismatch { expected: usize, actual: usize },

    /// Serialized count prefix is negative.
    NegativeCount(i32),

    /// Count does not fit the 32-bit wire prefix.
    CountOverflow { count: usize },
}

impl fmt::Display for BitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BitsError::*;
        match self {
            OutOfRange { index, len } =>
                write!(f, "bit index {} out of range (len {})", index, len),
            InvalidOperation(msg) =>
                write!(f, "invalid operation: {}", msg),
            Truncated { have, need } =>
                write!(f, "bit buffer too short: {} < {}", have, need),
            LengthMismatch { expected, actual } =>
                write!(f, "bit buffer length mismatch: expected {}, got {}", expected, actual),
            NegativeCount(raw) =>
                write!(f, "negative bit count prefix: {}", raw),
            CountOverflow { count } =>
                write!(f, "bit count {} does not fit the wire prefix", count),
        }
    }
}

impl std::error::Error for BitsError {}
