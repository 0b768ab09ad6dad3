//! telemetry/snapshot.rs
//!
//! Immutable view of a finished transfer: counters plus derived ratios.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TelemetryCounters,
    /// Padding bytes over all wire bytes, in `[0, 1]`.
    pub padding_ratio: f64,
    /// Payload bytes (both directions) per second of elapsed time.
    pub throughput_payload_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();
        let wire = counters.wire_bytes();
        let payload = counters.bytes_payload_sent + counters.bytes_payload_received;

        let padding_ratio = if wire > 0 {
            counters.bytes_padding as f64 / wire as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            payload as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            counters: counters.clone(),
            padding_ratio,
            throughput_payload_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    pub fn sanity_check(&self) -> bool {
        (0.0..=1.0).contains(&self.padding_ratio)
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
