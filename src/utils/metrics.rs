//! Observability and Metrics
//!
//! Process-wide counters for native handle lifetime and traffic, updated by
//! the socket layer on every successful operation.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for socket operations
#[derive(Debug)]
pub struct Metrics {
    /// Native handles opened by constructors
    pub handles_opened: AtomicU64,
    /// Native handles released on drop
    pub handles_closed: AtomicU64,
    /// Connections handed out by `accept`
    pub connections_accepted: AtomicU64,
    /// Successful outbound connects
    pub connections_established: AtomicU64,
    /// Total bytes sent (stream and datagram)
    pub bytes_sent: AtomicU64,
    /// Total bytes received (stream and datagram)
    pub bytes_received: AtomicU64,
    /// Datagrams sent with `send_to`
    pub datagrams_sent: AtomicU64,
    /// Datagrams received with `recv_from`
    pub datagrams_received: AtomicU64,
    /// Native calls that returned an error
    pub native_errors: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            handles_opened: AtomicU64::new(0),
            handles_closed: AtomicU64::new(0),
            connections_accepted: AtomicU64::new(0),
            connections_established: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            datagrams_sent: AtomicU64::new(0),
            datagrams_received: AtomicU64::new(0),
            native_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn handle_opened(&self) {
        self.handles_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn handle_closed(&self) {
        self.handles_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_accepted(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_established(&self) {
        self.connections_established.fetch_add(1, Ordering::Relaxed);
    }

    /// Record bytes handed to the native send call
    pub fn sent(&self, byte_count: usize) {
        self.bytes_sent.fetch_add(byte_count as u64, Ordering::Relaxed);
    }

    /// Record bytes returned by the native receive call
    pub fn received(&self, byte_count: usize) {
        self.bytes_received.fetch_add(byte_count as u64, Ordering::Relaxed);
    }

    pub fn datagram_sent(&self, byte_count: usize) {
        self.datagrams_sent.fetch_add(1, Ordering::Relaxed);
        self.sent(byte_count);
    }

    pub fn datagram_received(&self, byte_count: usize) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
        self.received(byte_count);
    }

    pub fn native_error(&self) {
        self.native_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            handles_opened: self.handles_opened.load(Ordering::Relaxed),
            handles_closed: self.handles_closed.load(Ordering::Relaxed),
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
            connections_established: self.connections_established.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            datagrams_sent: self.datagrams_sent.load(Ordering::Relaxed),
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            native_errors: self.native_errors.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            handles_opened = snapshot.handles_opened,
            handles_closed = snapshot.handles_closed,
            handles_live = snapshot.handles_live(),
            connections_accepted = snapshot.connections_accepted,
            connections_established = snapshot.connections_established,
            bytes_sent = snapshot.bytes_sent,
            bytes_received = snapshot.bytes_received,
            datagrams_sent = snapshot.datagrams_sent,
            datagrams_received = snapshot.datagrams_received,
            native_errors = snapshot.native_errors,
            uptime_seconds = snapshot.uptime_seconds,
            "Socket metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub handles_opened: u64,
    pub handles_closed: u64,
    pub connections_accepted: u64,
    pub connections_established: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub datagrams_sent: u64,
    pub datagrams_received: u64,
    pub native_errors: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Handles currently owned by some socket (accepted handles included)
    pub fn handles_live(&self) -> u64 {
        (self.handles_opened + self.connections_accepted).saturating_sub(self.handles_closed)
    }
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = Metrics::new();
        metrics.handle_opened();
        metrics.handle_opened();
        metrics.handle_closed();
        metrics.sent(10);
        metrics.datagram_sent(5);
        metrics.datagram_received(7);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.handles_opened, 2);
        assert_eq!(snapshot.handles_closed, 1);
        assert_eq!(snapshot.handles_live(), 1);
        assert_eq!(snapshot.bytes_sent, 15);
        assert_eq!(snapshot.datagrams_sent, 1);
        assert_eq!(snapshot.bytes_received, 7);
        assert_eq!(snapshot.datagrams_received, 1);
    }

    #[test]
    fn accepted_handles_count_as_live() {
        let metrics = Metrics::new();
        metrics.connection_accepted();
        assert_eq!(metrics.snapshot().handles_live(), 1);
        metrics.handle_closed();
        assert_eq!(metrics.snapshot().handles_live(), 0);
    }
}
