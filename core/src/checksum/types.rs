use std::fmt;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::constants::checksum_ids;
use crate::utils::enum_name_or_hex;

/// Integrity algorithm tag. The discriminant and the code length are both
/// part of the protected block wire format.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum ChecksumAlg {
    None       = checksum_ids::NONE,
    CheckSum8  = checksum_ids::CHECKSUM8,
    CheckSum16 = checksum_ids::CHECKSUM16,
    CheckSum32 = checksum_ids::CHECKSUM32,
    CheckSum64 = checksum_ids::CHECKSUM64,
    Fletcher16 = checksum_ids::FLETCHER16,
    Fletcher32 = checksum_ids::FLETCHER32,
}

impl ChecksumAlg {
    pub const ALL: [ChecksumAlg; 7] = [
        ChecksumAlg::None,
        ChecksumAlg::CheckSum8,
        ChecksumAlg::CheckSum16,
        ChecksumAlg::CheckSum32,
        ChecksumAlg::CheckSum64,
        ChecksumAlg::Fletcher16,
        ChecksumAlg::Fletcher32,
    ];

    /// Bytes of integrity code produced by this algorithm.
    #[inline]
    pub const fn code_len(self) -> usize {
        match self {
            ChecksumAlg::None       => 0,
            ChecksumAlg::CheckSum8  => 1,
            ChecksumAlg::CheckSum16 => 2,
            ChecksumAlg::CheckSum32 => 4,
            ChecksumAlg::CheckSum64 => 8,
            ChecksumAlg::Fletcher16 => 2,
            ChecksumAlg::Fletcher32 => 4,
        }
    }

    /// Wire tag.
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(raw: u8) -> Result<Self, ChecksumError> {
        Self::try_from_primitive(raw).map_err(|_| ChecksumError::UnknownAlgorithm { raw })
    }
}

impl Default for ChecksumAlg {
    fn default() -> Self {
        ChecksumAlg::Fletcher32
    }
}

impl fmt::Display for ChecksumAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChecksumAlg::None       => "none",
            ChecksumAlg::CheckSum8  => "checksum8",
            ChecksumAlg::CheckSum16 => "checksum16",
            ChecksumAlg::CheckSum32 => "checksum32",
            ChecksumAlg::CheckSum64 => "checksum64",
            ChecksumAlg::Fletcher16 => "fletcher16",
            ChecksumAlg::Fletcher32 => "fletcher32",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    UnknownAlgorithm { raw: u8 },
}

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumError::UnknownAlgorithm { raw } =>
                write!(f, "unknown checksum algorithm: {}", enum_name_or_hex::<ChecksumAlg>(*raw)),
        }
    }
}

impl std::error::Error for ChecksumError {}
