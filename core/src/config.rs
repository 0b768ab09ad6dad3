//! config.rs
//! Serde-backed settings for a framed connection.
//!
//! Every field has a default, so a partial JSON document is accepted:
//!
//! ```text
//! { "block_size": 8192, "receive_timeout_ms": null }
//! ```

use std::fmt;
use std::io;
use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::checksum::ChecksumAlg;
use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_MAX_MESSAGE_BYTES, DEFAULT_POLL_INTERVAL, DEFAULT_RECEIVE_TIMEOUT,
    MAX_PROTECTED_PAYLOAD,
};
use crate::transport::{check_block_size, TransportOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Wire bytes per block, strictly greater than 256.
    pub block_size: usize,
    /// Checksum used when payloads are protected before sending.
    pub algorithm: ChecksumAlg,
    /// Chunk size for `protect`, in `1..=32768`.
    pub max_block_bytes: usize,
    /// `None` waits indefinitely.
    pub receive_timeout_ms: Option<u64>,
    pub poll_interval_ms: u64,
    pub max_message_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            algorithm: ChecksumAlg::default(),
            max_block_bytes: MAX_PROTECTED_PAYLOAD,
            receive_timeout_ms: Some(DEFAULT_RECEIVE_TIMEOUT.as_millis() as u64),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_block_size(self.block_size)
            .map_err(|e| ConfigError::Invalid(format!("block_size: {}", e)))?;

        if self.max_block_bytes == 0 || self.max_block_bytes > MAX_PROTECTED_PAYLOAD {
            return Err(ConfigError::Invalid(format!(
                "max_block_bytes: {} not in 1..={}",
                self.max_block_bytes, MAX_PROTECTED_PAYLOAD
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be > 0".into()));
        }
        if self.max_message_bytes == 0 {
            return Err(ConfigError::Invalid("max_message_bytes must be > 0".into()));
        }
        Ok(())
    }

    pub fn receive_timeout(&self) -> Option<Duration> {
        self.receive_timeout_ms.map(Duration::from_millis)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            poll_interval: self.poll_interval(),
            max_message_bytes: self.max_message_bytes,
            timeout: self.receive_timeout(),
        }
    }

    /// Parse and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(String),
    Parse(serde_json::Error),
    Io(io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Io(e) => write!(f, "config io error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}
