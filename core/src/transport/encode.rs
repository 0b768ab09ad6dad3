use std::time::Instant;
use tracing::{debug, trace};

use crate::constants::BLOCK_HEADER_LEN;
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::transport::stream::BlockStream;
use crate::transport::types::{check_block_size, BlockHeader, StreamCaps, TransportError};
use crate::utils::div_round_up;

/// Send `payload` as a sequence of fixed-size blocks.
///
/// Layout of every block:
///
/// ```text
/// [ remaining (4) ]   blocks still to follow, 0 on the last
/// [ data_len  (4) ]
/// [ data (data_len) ][ zero padding up to block_size ]
/// ```
pub fn send<S>(stream: &mut S, payload: &[u8], block_size: usize) -> Result<(), TransportError>
where
    S: BlockStream + ?Sized,
{
    let mut counters = TelemetryCounters::default();
    let mut times = StageTimes::default();
    send_with(stream, payload, block_size, &mut counters, &mut times)
}

/// `send`, recording byte accounting into `counters`.
///
/// Block assembly is charged to `Stage::Encode`, writes and flushes to
/// `Stage::Send`.
pub fn send_with<S>(
    stream: &mut S,
    payload: &[u8],
    block_size: usize,
    counters: &mut TelemetryCounters,
    times: &mut StageTimes,
) -> Result<(), TransportError>
where
    S: BlockStream + ?Sized,
{
    if payload.is_empty() {
        return Err(TransportError::EmptyPayload);
    }
    let caps = stream.caps();
    if !caps.contains(StreamCaps::WRITABLE) {
        return Err(TransportError::NotWritable);
    }
    check_block_size(block_size)?;

    let data_per_block = block_size - BLOCK_HEADER_LEN;
    let total = div_round_up(payload.len(), data_per_block);
    let total_u32 = u32::try_from(total).map_err(|_| TransportError::TooManyBlocks { blocks: total })?;

    let flush_each = !caps.contains(StreamCaps::SOCKET);
    let mut block = vec![0u8; block_size];

    for (i, chunk) in payload.chunks(data_per_block).enumerate() {
        let started = Instant::now();
        let header = BlockHeader {
            remaining: total_u32 - 1 - i as u32,
            data_len: chunk.len() as u32,
        };
        header.write_to(&mut block[..BLOCK_HEADER_LEN]);

        let data_end = BLOCK_HEADER_LEN + chunk.len();
        block[BLOCK_HEADER_LEN..data_end].copy_from_slice(chunk);
        block[data_end..].fill(0);
        times.add(Stage::Encode, started.elapsed());

        let started = Instant::now();
        stream.write_block(&block)?;
        if flush_each {
            stream.flush_block()?;
        }
        times.add(Stage::Send, started.elapsed());

        counters.add_sent_block(chunk.len(), block_size);
        trace!(remaining = header.remaining, data_len = header.data_len, "block sent");
    }

    counters.add_sent_message();
    debug!(bytes = payload.len(), blocks = total, block_size, "message sent");
    Ok(())
}
