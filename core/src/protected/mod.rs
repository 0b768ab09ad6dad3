//! protected/mod.rs
//! Payloads carried together with an integrity code.
//!
//! Responsibilities:
//! - Bind a payload (≤ 32 KiB) to a checksum code
//! - Encode / decode the `[alg][len][payload][code]` wire form
//! - Split large payloads into blocks and reassemble them
//!
//! Non-responsibilities:
//! - Error correction (a failed check is only reported)
//! - IO

pub mod types;
pub mod encode;
pub mod decode;
pub mod chunking;

pub use types::{BlockError, ProtectedBlock};
pub use encode::encode_block;
pub use decode::{decode_block, decode_sequence};
pub use chunking::{corrupted_indices, protect, protect_to_bytes, reassemble, unprotect};
