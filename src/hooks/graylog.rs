//! Asynchronous Graylog hook
//!
//! Forwards records to a Graylog input as GELF 1.1 over UDP. Records are
//! serialized on the caller's thread and handed to a background worker over a
//! bounded channel, so logging never waits on the network. When the queue is
//! full the record is dropped and counted. There is no retry.

use crate::core::{
    Formatter, Hook, LogContext, LogEntry, LogLevel, LoggerError, LoggerMetrics, Result,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Largest datagram sent in one piece; bigger payloads are chunked
pub const CHUNK_SIZE: usize = 1420;

/// GELF chunk header: magic (2) + message id (8) + sequence number + count
const CHUNK_HEADER_LEN: usize = 12;

const CHUNK_DATA_LEN: usize = CHUNK_SIZE - CHUNK_HEADER_LEN;

/// GELF allows at most 128 chunks per message
const MAX_CHUNKS: usize = 128;

const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];

pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

/// How long `flush` and drop wait for the worker to drain the queue
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Hook forwarding records at or above a minimum level to Graylog
///
/// # Example
///
/// ```no_run
/// use split_logging::hooks::GraylogHook;
/// use split_logging::prelude::*;
/// use std::sync::Arc;
///
/// let hook = GraylogHook::builder("graylog.internal:12201")
///     .with_extra(LogContext::new().with_field("service", "billing"))
///     .with_min_level(LogLevel::Warn)
///     .build()
///     .expect("Failed to set up Graylog hook");
///
/// let logger = Logger::new();
/// logger.add_hook(Arc::new(hook));
/// logger.error("payment provider unreachable");
/// ```
pub struct GraylogHook {
    address: SocketAddr,
    levels: Vec<LogLevel>,
    extra: LogContext,
    host: String,
    capacity: usize,
    sender: Option<Sender<Vec<u8>>>,
    worker: Option<thread::JoinHandle<()>>,
    pending: Arc<AtomicUsize>,
    metrics: Arc<LoggerMetrics>,
}

impl GraylogHook {
    /// Start configuring a hook for `addr` (`host:port`)
    pub fn builder(addr: impl Into<String>) -> GraylogHookBuilder {
        GraylogHookBuilder::new(addr)
    }

    /// Hook for `addr` with default settings: warnings and above, gzip
    pub fn new(addr: impl Into<String>, extra: LogContext) -> Result<Self> {
        Self::builder(addr).with_extra(extra).build()
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `sent` is counted as logged, a full queue as dropped and a failed
    /// send as an output failure
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Build the GELF document for `entry`
    pub fn gelf_message(&self, entry: &LogEntry) -> serde_json::Value {
        let mut msg = serde_json::Map::new();
        msg.insert("version".to_string(), "1.1".into());
        msg.insert("host".to_string(), self.host.clone().into());
        msg.insert("short_message".to_string(), entry.short_message().into());
        if entry.is_multiline() {
            msg.insert("full_message".to_string(), entry.message.clone().into());
        }
        let timestamp = entry.timestamp.timestamp_millis() as f64 / 1000.0;
        msg.insert("timestamp".to_string(), timestamp.into());
        msg.insert("level".to_string(), entry.level.syslog_severity().into());
        msg.insert(
            "_level_name".to_string(),
            entry.level.as_lower_str().into(),
        );

        // Entry fields override the static extras
        for (key, value) in self.extra.fields().iter().chain(entry.fields.fields()) {
            msg.insert(additional_field_name(key), value.to_json_value());
        }

        serde_json::Value::Object(msg)
    }

    fn enqueue(&self, payload: Vec<u8>) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(LoggerError::ChannelSendError)?;

        self.pending.fetch_add(1, Ordering::AcqRel);
        match sender.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.pending.fetch_sub(1, Ordering::AcqRel);
                self.metrics.record_dropped();
                Err(LoggerError::queue_full(self.capacity))
            }
            Err(TrySendError::Disconnected(_)) => {
                self.pending.fetch_sub(1, Ordering::AcqRel);
                Err(LoggerError::ChannelSendError)
            }
        }
    }

    /// Wait until every queued message has been handed to the socket
    fn wait_for_drain(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while self.pending.load(Ordering::Acquire) > 0 {
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        true
    }
}

impl Hook for GraylogHook {
    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    /// GELF has its own encoding, so the sink's formatter is not used
    fn fire(&self, entry: &LogEntry, _formatter: &dyn Formatter) -> Result<()> {
        let payload = serde_json::to_vec(&self.gelf_message(entry))?;
        self.enqueue(payload)
    }

    fn flush(&self) -> Result<()> {
        if self.wait_for_drain(DEFAULT_FLUSH_TIMEOUT) {
            Ok(())
        } else {
            Err(LoggerError::writer(format!(
                "Graylog queue for {} not drained within {:?}",
                self.address, DEFAULT_FLUSH_TIMEOUT
            )))
        }
    }

    fn name(&self) -> &str {
        "graylog"
    }
}

impl Drop for GraylogHook {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit
        drop(self.sender.take());

        if let Some(handle) = self.worker.take() {
            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Graylog worker thread panicked: {:?}", e);
                    }
                    break;
                }

                if start.elapsed() >= DEFAULT_FLUSH_TIMEOUT {
                    eprintln!(
                        "[LOGGER WARNING] Graylog worker did not finish within {:?}. \
                         Some logs may be lost.",
                        DEFAULT_FLUSH_TIMEOUT
                    );
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}

/// Builder for [`GraylogHook`]
pub struct GraylogHookBuilder {
    address: String,
    extra: LogContext,
    min_level: LogLevel,
    capacity: usize,
    host: Option<String>,
    compress: bool,
}

impl GraylogHookBuilder {
    fn new(addr: impl Into<String>) -> Self {
        Self {
            address: addr.into(),
            extra: LogContext::new(),
            min_level: LogLevel::Warn,
            capacity: DEFAULT_QUEUE_CAPACITY,
            host: None,
            compress: true,
        }
    }

    /// Static fields attached to every forwarded record
    #[must_use = "builder methods return a new value"]
    pub fn with_extra(mut self, extra: LogContext) -> Self {
        self.extra = extra;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Override the `host` reported to Graylog (defaults to the hostname)
    #[must_use = "builder methods return a new value"]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Gzip payloads before sending (default: on)
    #[must_use = "builder methods return a new value"]
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Resolve the address, open the UDP socket and start the worker
    pub fn build(self) -> Result<GraylogHook> {
        if self.capacity == 0 {
            return Err(LoggerError::config("GraylogHook", "queue capacity must be positive"));
        }

        let address = self
            .address
            .to_socket_addrs()
            .map_err(|e| {
                LoggerError::io_operation(
                    "resolving Graylog address",
                    format!("cannot resolve '{}'", self.address),
                    e,
                )
            })?
            .next()
            .ok_or_else(|| {
                LoggerError::config("GraylogHook", format!("no address for '{}'", self.address))
            })?;

        let bind_addr = if address.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(address)?;

        let (sender, receiver) = bounded(self.capacity);
        let pending = Arc::new(AtomicUsize::new(0));
        let metrics = Arc::new(LoggerMetrics::new());

        let worker = {
            let pending = Arc::clone(&pending);
            let metrics = Arc::clone(&metrics);
            let compress = self.compress;
            thread::Builder::new()
                .name("graylog-hook".to_string())
                .spawn(move || run_worker(socket, receiver, compress, &pending, &metrics))?
        };

        Ok(GraylogHook {
            address,
            levels: self.min_level.and_above(),
            extra: self.extra,
            host: self.host.unwrap_or_else(local_hostname),
            capacity: self.capacity,
            sender: Some(sender),
            worker: Some(worker),
            pending,
            metrics,
        })
    }
}

fn run_worker(
    socket: UdpSocket,
    receiver: Receiver<Vec<u8>>,
    compress: bool,
    pending: &AtomicUsize,
    metrics: &LoggerMetrics,
) {
    for payload in receiver.iter() {
        match send_message(&socket, &payload, compress) {
            Ok(()) => {
                metrics.record_logged();
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Graylog send failed: {}", e);
                metrics.record_output_failure();
            }
        }
        pending.fetch_sub(1, Ordering::AcqRel);
    }
}

fn send_message(socket: &UdpSocket, payload: &[u8], compress: bool) -> Result<()> {
    let data = if compress {
        gzip(payload)?
    } else {
        payload.to_vec()
    };

    if data.len() <= CHUNK_SIZE {
        socket.send(&data)?;
        return Ok(());
    }

    for chunk in chunk_datagrams(&data, rand::random::<[u8; 8]>())? {
        socket.send(&chunk)?;
    }
    Ok(())
}

fn gzip(payload: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(payload.len() / 2), Compression::default());
    encoder.write_all(payload)?;
    Ok(encoder.finish()?)
}

/// Split `data` into GELF chunks tagged with `message_id`
pub fn chunk_datagrams(data: &[u8], message_id: [u8; 8]) -> Result<Vec<Vec<u8>>> {
    let count = data.len().div_ceil(CHUNK_DATA_LEN);
    if count > MAX_CHUNKS {
        return Err(LoggerError::writer(format!(
            "GELF message of {} bytes needs {} chunks, limit is {}",
            data.len(),
            count,
            MAX_CHUNKS
        )));
    }

    Ok(data
        .chunks(CHUNK_DATA_LEN)
        .enumerate()
        .map(|(seq, piece)| {
            let mut datagram = Vec::with_capacity(CHUNK_HEADER_LEN + piece.len());
            datagram.extend_from_slice(&CHUNK_MAGIC);
            datagram.extend_from_slice(&message_id);
            datagram.push(seq as u8);
            datagram.push(count as u8);
            datagram.extend_from_slice(piece);
            datagram
        })
        .collect())
}

/// GELF additional fields are `_`-prefixed; `_id` is reserved
fn additional_field_name(key: &str) -> String {
    if key == "id" {
        "__id".to_string()
    } else {
        format!("_{}", key)
    }
}

fn local_hostname() -> String {
    gethostname::gethostname()
        .into_string()
        .ok()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
