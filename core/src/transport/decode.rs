use std::thread;
use std::time::{Duration, Instant};
use bytes::BytesMut;
use tracing::{debug, trace};

use crate::constants::BLOCK_HEADER_LEN;
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::transport::stream::BlockStream;
use crate::transport::types::{
    check_block_size, BlockHeader, ReceiveOutcome, StreamCaps, TransportError, TransportOptions,
};

/// Receive state carried across calls on one stream.
///
/// A message abandoned partway (deadline or cancellation) leaves its tail
/// blocks on the stream. The next `receive_synced` discards them before it
/// accepts the first block of a new message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiveSync {
    discard: Option<u32>,
}

impl ReceiveSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// `remaining` expected on the next tail block still to be discarded.
    pub fn pending_tail(&self) -> Option<u32> {
        self.discard
    }

    /// True when the next block read starts a new message.
    pub fn is_aligned(&self) -> bool {
        self.discard.is_none()
    }
}

enum Wait {
    Ready,
    Closed,
    Expired,
    Cancelled,
}

/// Receive one message, waiting at most `timeout` (`None` waits forever).
pub fn receive<S>(
    stream: &mut S,
    block_size: usize,
    timeout: Option<Duration>,
) -> Result<ReceiveOutcome, TransportError>
where
    S: BlockStream + ?Sized,
{
    let opts = TransportOptions { timeout, ..TransportOptions::default() };
    let mut counters = TelemetryCounters::default();
    let mut times = StageTimes::default();
    receive_with(stream, block_size, &opts, &mut counters, &mut times)
}

/// `receive` with explicit options, recording into `counters` and `times`.
///
/// Each call starts aligned. Callers that keep reading a stream after a
/// `TimedOut` use `receive_synced`.
pub fn receive_with<S>(
    stream: &mut S,
    block_size: usize,
    opts: &TransportOptions,
    counters: &mut TelemetryCounters,
    times: &mut StageTimes,
) -> Result<ReceiveOutcome, TransportError>
where
    S: BlockStream + ?Sized,
{
    let mut sync = ReceiveSync::new();
    receive_synced(stream, block_size, opts, &mut sync, counters, times, || true)
}

/// Receive one message, resuming from `sync`.
///
/// Blocks are only ever read whole. Between checks the call sleeps for
/// `opts.poll_interval`; `keep_going` and the deadline are checked after each
/// empty poll. Time spent polling is charged to `Stage::Wait`, block reads to
/// `Stage::Receive` and header checks plus reassembly to `Stage::Decode`.
pub fn receive_synced<S, F>(
    stream: &mut S,
    block_size: usize,
    opts: &TransportOptions,
    sync: &mut ReceiveSync,
    counters: &mut TelemetryCounters,
    times: &mut StageTimes,
    keep_going: F,
) -> Result<ReceiveOutcome, TransportError>
where
    S: BlockStream + ?Sized,
    F: Fn() -> bool,
{
    let caps = stream.caps();
    if !caps.contains(StreamCaps::READABLE) {
        return Err(TransportError::NotReadable);
    }
    if !caps.intersects(StreamCaps::SEEKABLE | StreamCaps::SOCKET) {
        return Err(TransportError::NotSeekable);
    }
    check_block_size(block_size)?;

    let deadline = opts.timeout.map(|t| Instant::now() + t);
    let data_per_block = block_size - BLOCK_HEADER_LEN;
    let mut block = vec![0u8; block_size];
    let mut message = BytesMut::new();
    let mut expected_remaining: Option<u32> = None;

    loop {
        let started = Instant::now();
        let wait = wait_for_block(stream, block_size, opts.poll_interval, deadline, &keep_going)?;
        times.add(Stage::Wait, started.elapsed());

        let outcome = match wait {
            Wait::Ready => None,
            Wait::Closed => Some(ReceiveOutcome::Disconnected),
            Wait::Expired => Some(ReceiveOutcome::TimedOut),
            Wait::Cancelled => Some(ReceiveOutcome::Cancelled),
        };
        if let Some(outcome) = outcome {
            if expected_remaining.is_some() {
                sync.discard = expected_remaining;
            }
            debug!(?outcome, received = message.len(), pending_tail = ?sync.discard, "receive ended early");
            return Ok(outcome);
        }

        let started = Instant::now();
        stream.read_block(&mut block)?;
        times.add(Stage::Receive, started.elapsed());

        let started = Instant::now();
        let header = BlockHeader::parse(&block)?;

        if let Some(expected) = sync.discard {
            check_header(&header, Some(expected), data_per_block, opts.max_message_bytes)?;
            counters.add_received_block(header.data_len as usize, block_size);
            sync.discard = header.remaining.checked_sub(1);
            times.add(Stage::Decode, started.elapsed());
            trace!(remaining = header.remaining, "tail block discarded");
            continue;
        }

        check_header(&header, expected_remaining, data_per_block, opts.max_message_bytes)?;

        if expected_remaining.is_none() {
            let announced = (header.remaining as usize + 1).saturating_mul(data_per_block);
            message.reserve(announced.min(opts.max_message_bytes));
        }

        let data_end = BLOCK_HEADER_LEN + header.data_len as usize;
        message.extend_from_slice(&block[BLOCK_HEADER_LEN..data_end]);
        counters.add_received_block(header.data_len as usize, block_size);
        times.add(Stage::Decode, started.elapsed());
        trace!(remaining = header.remaining, data_len = header.data_len, "block received");

        if header.is_final() {
            break;
        }
        expected_remaining = Some(header.remaining - 1);
    }

    counters.add_received_message();
    debug!(bytes = message.len(), block_size, "message received");
    Ok(ReceiveOutcome::Message(message.freeze()))
}

/// Sleep until a whole block is buffered.
fn wait_for_block<S, F>(
    stream: &mut S,
    block_size: usize,
    poll_interval: Duration,
    deadline: Option<Instant>,
    keep_going: &F,
) -> Result<Wait, TransportError>
where
    S: BlockStream + ?Sized,
    F: Fn() -> bool,
{
    loop {
        match stream.available(block_size)? {
            None => return Ok(Wait::Closed),
            Some(n) if n >= block_size => return Ok(Wait::Ready),
            Some(_) => {}
        }
        if !keep_going() {
            return Ok(Wait::Cancelled);
        }
        if let Some(d) = deadline {
            if Instant::now() >= d {
                return Ok(Wait::Expired);
            }
        }
        thread::sleep(poll_interval);
    }
}

/// Sanity bounds on a received header.
pub fn check_header(
    header: &BlockHeader,
    expected_remaining: Option<u32>,
    data_per_block: usize,
    max_message_bytes: usize,
) -> Result<(), TransportError> {
    if header.data_len as usize > data_per_block {
        return Err(TransportError::DataLenOutOfRange {
            data_len: header.data_len,
            max: data_per_block,
        });
    }
    if header.data_len == 0 {
        return Err(TransportError::EmptyBlock);
    }

    match expected_remaining {
        None => {
            // Every block before the last is full, so this is a lower bound.
            let announced = header.remaining as u64 * data_per_block as u64 + 1;
            if announced > max_message_bytes as u64 {
                return Err(TransportError::MessageTooLarge {
                    announced,
                    max: max_message_bytes,
                });
            }
        }
        Some(expected) if header.remaining != expected => {
            return Err(TransportError::SequenceBroken {
                expected,
                actual: header.remaining,
            });
        }
        Some(_) => {}
    }

    if !header.is_final() && header.data_len as usize != data_per_block {
        return Err(TransportError::ShortIntermediateBlock {
            data_len: header.data_len,
            expected: data_per_block,
        });
    }
    Ok(())
}
