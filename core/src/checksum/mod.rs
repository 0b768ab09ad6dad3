//! checksum/mod.rs
//! Small integrity codes over a byte payload.
//!
//! Every function here is pure and deterministic. Codes are emitted
//! little-endian with the fixed length given by `ChecksumAlg::code_len`.

pub mod types;
pub mod sums;
pub mod fletcher;

pub use types::{ChecksumAlg, ChecksumError};
pub use sums::{checksum8, checksum16, checksum32, checksum64};
pub use fletcher::{fletcher16, fletcher32};

/// Compute the integrity code of `payload` under `alg`.
pub fn compute(alg: ChecksumAlg, payload: &[u8]) -> Vec<u8> {
    let code = match alg {
        ChecksumAlg::None       => Vec::new(),
        ChecksumAlg::CheckSum8  => vec![checksum8(payload)],
        ChecksumAlg::CheckSum16 => checksum16(payload).to_le_bytes().to_vec(),
        ChecksumAlg::CheckSum32 => checksum32(payload).to_le_bytes().to_vec(),
        ChecksumAlg::CheckSum64 => checksum64(payload).to_le_bytes().to_vec(),
        ChecksumAlg::Fletcher16 => fletcher16(payload).to_le_bytes().to_vec(),
        ChecksumAlg::Fletcher32 => fletcher32(payload).to_le_bytes().to_vec(),
    };
    debug_assert_eq!(code.len(), alg.code_len());
    code
}

/// Recompute and compare against `code` without early exit.
pub fn verify(alg: ChecksumAlg, payload: &[u8], code: &[u8]) -> bool {
    let actual = compute(alg, payload);
    if actual.len() != code.len() {
        return false;
    }
    actual
        .iter()
        .zip(code)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
