//! bitframe-core
//!
//! Bit containers, integrity codes, protected blocks and fixed-size block
//! framing over byte streams. Blocking I/O only; no async runtime.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Data layers
pub mod bits;
pub mod checksum;
pub mod protected;

// Stream layers
pub mod transport;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::bits::{BitContainer, BitsError};
    pub use crate::checksum::{ChecksumAlg, ChecksumError};
    pub use crate::config::{ConfigError, TransportConfig};
    pub use crate::protected::{protect, protect_to_bytes, unprotect, BlockError, ProtectedBlock};
    pub use crate::telemetry::{TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
    pub use crate::transport::{
        receive, send, BlockStream, FramedClient, ReceiveOutcome, SeekableStream, SocketStream,
        TransportError, WriteStream,
    };
    pub use crate::types::StreamError;
}
