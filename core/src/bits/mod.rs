//! bits/mod.rs
//! Bit-level storage.
//!
//! Responsibilities:
//! - Hold an indexable, growable sequence of bits
//! - Bulk and typed appends/reads
//! - Wire form (`count` prefix + packed words)

pub mod types;
pub mod typed;
pub mod encode;
pub mod decode;

pub use types::{BitContainer, BitsError};
pub use encode::encode_bits;
pub use decode::decode_bits;
