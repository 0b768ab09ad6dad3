//! constants.rs
//! Wire-format constants shared by every layer.
//!
//! All multi-byte integers on the wire are little-endian.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Bit container
// ---------------------------------------------------------------------------

/// Width of one backing word in a `BitContainer`.
pub const WORD_BITS: usize = u32::BITS as usize;
/// Bytes per backing word on the wire.
pub const WORD_BYTES: usize = WORD_BITS / 8;
/// Length of the `count` prefix in a serialized container.
pub const BITS_COUNT_PREFIX_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Protected blocks
// ---------------------------------------------------------------------------

/// Largest payload accepted by `ProtectedBlock::new` (32 KiB).
pub const MAX_PROTECTED_PAYLOAD: usize = 32 * 1024;
/// `[alg:1][len:2]`
pub const PROTECTED_HEADER_LEN: usize = 1 + 2;

/// Checksum tag identifiers (mirrored in the protected block header).
pub mod checksum_ids {
    pub const NONE: u8        = 0x00;
    pub const CHECKSUM8: u8   = 0x01;
    pub const CHECKSUM16: u8  = 0x02;
    pub const CHECKSUM32: u8  = 0x03;
    pub const CHECKSUM64: u8  = 0x04;
    pub const FLETCHER16: u8  = 0x05;
    pub const FLETCHER32: u8  = 0x06;
}

// ---------------------------------------------------------------------------
// Framed transport
// ---------------------------------------------------------------------------

/// `[remaining_blocks:4][data_len:4]`
pub const BLOCK_HEADER_LEN: usize = 8;
/// Block sizes must be strictly greater than this.
pub const MIN_BLOCK_SIZE_EXCLUSIVE: usize = 256;
/// Default wire size of one transport block.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;
/// Availability poll period while waiting for a full block.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Default receive deadline.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound on a single reassembled message (256 MiB).
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 256 * 1024 * 1024;
