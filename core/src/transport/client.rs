//! A TCP peer that sends framed messages and delivers received ones on a channel.
//!
//! Design notes:
//! - Writers share one `SocketStream` behind a `Mutex`; every `send_message`
//!   writes a whole message before releasing it.
//! - The listener owns a `try_clone` of the socket and is the only reader.
//! - The listener exits on disconnect or on any protocol error. The receiving
//!   end of the channel sees it as a closed channel.
//! - A message abandoned at the deadline, or by `stop_listening`, has its
//!   tail discarded before the next message is accepted. The discard state
//!   survives a listener restart.

use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use bytes::Bytes;
use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::transport::decode::{receive_synced, ReceiveSync};
use crate::transport::encode::send_with;
use crate::transport::stream::{BlockStream, SocketStream};
use crate::transport::types::{ReceiveOutcome, TransportError};
use crate::types::StreamError;

#[derive(Default)]
struct ListenerState {
    running: AtomicBool,
    busy: AtomicBool,
    received: AtomicU64,
}

#[derive(Default)]
struct SendStats {
    counters: TelemetryCounters,
    times: StageTimes,
}

pub struct FramedClient {
    writer: Mutex<SocketStream>,
    config: TransportConfig,
    state: Arc<ListenerState>,
    listener: Option<JoinHandle<ReceiveSync>>,
    sync: ReceiveSync,
    closed: AtomicBool,
    sent: Mutex<SendStats>,
}

impl FramedClient {
    pub fn connect(addr: impl ToSocketAddrs, config: TransportConfig) -> Result<Self, StreamError> {
        let stream = TcpStream::connect(addr)?;
        Self::new(stream, config)
    }

    pub fn new(stream: TcpStream, config: TransportConfig) -> Result<Self, StreamError> {
        config.validate()?;
        stream.set_nodelay(true)?;
        Ok(Self {
            writer: Mutex::new(SocketStream::new(stream)),
            config,
            state: Arc::new(ListenerState::default()),
            listener: None,
            sync: ReceiveSync::new(),
            closed: AtomicBool::new(false),
            sent: Mutex::new(SendStats::default()),
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Frame and write one message with the configured block size.
    pub fn send_message(&self, payload: &[u8]) -> Result<(), TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Disconnected);
        }
        let mut writer = self.writer.lock().unwrap_or_else(|p| p.into_inner());
        let mut counters = TelemetryCounters::default();
        let mut times = StageTimes::default();
        send_with(&mut *writer, payload, self.config.block_size, &mut counters, &mut times)?;
        drop(writer);

        let mut sent = self.sent.lock().unwrap_or_else(|p| p.into_inner());
        sent.counters.merge(&counters);
        sent.times.merge(&times);
        Ok(())
    }

    /// Spawn the receive thread. Messages arrive on the returned channel.
    pub fn start_listening(&mut self) -> Result<Receiver<Bytes>, TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Disconnected);
        }
        if self.is_listening() {
            return Err(TransportError::AlreadyListening);
        }
        // A listener that exited on its own still needs joining.
        self.stop_listening();

        let reader = self
            .writer
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .try_clone()?;
        let (tx, rx) = channel::unbounded();

        self.state.running.store(true, Ordering::Release);
        let state = Arc::clone(&self.state);
        let config = self.config.clone();
        let sync = self.sync;
        let handle = thread::Builder::new()
            .name("bitframe-listener".into())
            .spawn(move || listen_loop(reader, config, state, sync, tx))?;

        self.listener = Some(handle);
        Ok(rx)
    }

    /// Signal the receive thread and wait for it to exit.
    ///
    /// Returns within about one poll interval, even mid-message.
    pub fn stop_listening(&mut self) {
        self.state.running.store(false, Ordering::Release);
        if let Some(handle) = self.listener.take() {
            match handle.join() {
                Ok(sync) => self.sync = sync,
                Err(_) => warn!("listener thread panicked"),
            }
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some() && self.state.running.load(Ordering::Acquire)
    }

    /// True while a message is partway through being received.
    pub fn receiver_busy(&self) -> bool {
        self.state.busy.load(Ordering::Acquire)
    }

    pub fn received_messages(&self) -> u64 {
        self.state.received.load(Ordering::Acquire)
    }

    /// Send-side counters accumulated by `send_message`.
    pub fn sent_counters(&self) -> TelemetryCounters {
        self.sent.lock().unwrap_or_else(|p| p.into_inner()).counters.clone()
    }

    /// Encode and send time accumulated by `send_message`.
    pub fn sent_stage_times(&self) -> StageTimes {
        self.sent.lock().unwrap_or_else(|p| p.into_inner()).times.clone()
    }

    /// False while tail blocks of an abandoned message remain to be skipped.
    ///
    /// Only updated when a listener is joined.
    pub fn is_aligned(&self) -> bool {
        self.sync.is_aligned()
    }

    pub fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    /// Shut the socket down and stop listening.
    pub fn disconnect(&mut self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.state.running.store(false, Ordering::Release);
        let shutdown = self.writer.lock().unwrap_or_else(|p| p.into_inner()).shutdown();
        self.stop_listening();
        debug!("client disconnected");
        shutdown.map_err(TransportError::from)
    }
}

impl Drop for FramedClient {
    fn drop(&mut self) {
        self.stop_listening();
    }
}

fn listen_loop(
    mut stream: SocketStream,
    config: TransportConfig,
    state: Arc<ListenerState>,
    mut sync: ReceiveSync,
    tx: Sender<Bytes>,
) -> ReceiveSync {
    let opts = config.transport_options();
    let mut counters = TelemetryCounters::default();
    let mut times = StageTimes::default();
    let keep_going = || state.running.load(Ordering::Acquire);

    while keep_going() {
        match stream.available(config.block_size) {
            Ok(None) => {
                debug!("peer closed connection");
                break;
            }
            Ok(Some(0)) => {
                thread::sleep(opts.poll_interval);
                continue;
            }
            Ok(Some(_)) => {}
            Err(e) => {
                warn!(error = %e, "availability check failed");
                break;
            }
        }

        state.busy.store(true, Ordering::Release);
        let result = receive_synced(
            &mut stream,
            config.block_size,
            &opts,
            &mut sync,
            &mut counters,
            &mut times,
            keep_going,
        );
        state.busy.store(false, Ordering::Release);

        match result {
            Ok(ReceiveOutcome::Message(msg)) => {
                state.received.fetch_add(1, Ordering::AcqRel);
                if tx.send(msg).is_err() {
                    debug!("message receiver dropped");
                    break;
                }
            }
            Ok(ReceiveOutcome::TimedOut) => {
                warn!(
                    timeout = ?opts.timeout,
                    pending_tail = ?sync.pending_tail(),
                    "message incomplete at deadline"
                );
            }
            Ok(ReceiveOutcome::Cancelled) => break,
            Ok(ReceiveOutcome::Disconnected) => {
                debug!("peer closed connection");
                break;
            }
            Err(e) => {
                warn!(error = %e, "receive failed, listener stopping");
                break;
            }
        }
    }

    state.running.store(false, Ordering::Release);
    debug!(
        messages = counters.messages_received,
        blocks = counters.blocks_received,
        wait_ms = times.get_ms(Stage::Wait),
        decode_ms = times.get_ms(Stage::Decode),
        "listener exited"
    );
    sync
}
