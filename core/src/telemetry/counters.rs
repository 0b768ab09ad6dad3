//! telemetry/counters.rs
//! Mutable counters filled in by `send_with` / `receive_with`.
//!
//! Converted into an immutable `TelemetrySnapshot` once the caller is done.
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::constants::BLOCK_HEADER_LEN;

#[derive(Default, Clone, Debug, Encode, Decode, Serialize, Deserialize, PartialEq, Eq)]
pub struct TelemetryCounters {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub blocks_sent: u64,
    pub blocks_received: u64,
    /// Message bytes carried in blocks (excludes headers and padding).
    pub bytes_payload_sent: u64,
    pub bytes_payload_received: u64,
    /// Zero fill after the last data byte of short blocks.
    pub bytes_padding: u64,
    /// `BLOCK_HEADER_LEN` per block, both directions.
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one block written to the wire.
    pub fn add_sent_block(&mut self, data_len: usize, block_size: usize) {
        self.blocks_sent += 1;
        self.bytes_payload_sent += data_len as u64;
        self.bytes_overhead += BLOCK_HEADER_LEN as u64;
        self.bytes_padding += block_size.saturating_sub(BLOCK_HEADER_LEN + data_len) as u64;
    }

    /// Record one block read from the wire.
    pub fn add_received_block(&mut self, data_len: usize, block_size: usize) {
        self.blocks_received += 1;
        self.bytes_payload_received += data_len as u64;
        self.bytes_overhead += BLOCK_HEADER_LEN as u64;
        self.bytes_padding += block_size.saturating_sub(BLOCK_HEADER_LEN + data_len) as u64;
    }

    pub fn add_sent_message(&mut self) {
        self.messages_sent += 1;
    }

    pub fn add_received_message(&mut self) {
        self.messages_received += 1;
    }

    /// Total bytes that crossed the wire in either direction.
    pub fn wire_bytes(&self) -> u64 {
        self.bytes_payload_sent + self.bytes_payload_received + self.bytes_padding + self.bytes_overhead
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.messages_sent += other.messages_sent;
        self.messages_received += other.messages_received;
        self.blocks_sent += other.blocks_sent;
        self.blocks_received += other.blocks_received;
        self.bytes_payload_sent += other.bytes_payload_sent;
        self.bytes_payload_received += other.bytes_payload_received;
        self.bytes_padding += other.bytes_padding;
        self.bytes_overhead += other.bytes_overhead;
    }

    /// Compact binary form for persisting counters between runs.
    pub fn to_bincode(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::encode_to_vec(self, bincode::config::standard())
    }

    pub fn from_bincode(buf: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let (counters, _) = bincode::decode_from_slice(buf, bincode::config::standard())?;
        Ok(counters)
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
