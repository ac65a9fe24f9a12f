// Bridge and store metrics
//
// Lightweight counters for the host/UI boundary, logged on shutdown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for bridge traffic and state notifications.
///
/// Uses atomic operations so the host gateway task and the UI context thread
/// can share one instance without locks.
#[derive(Debug)]
pub struct BridgeMetrics {
    /// Bridge requests that produced a successful reply
    pub requests_handled: AtomicU64,

    /// Bridge requests whose privileged action failed
    pub request_failures: AtomicU64,

    /// Menu events handed to the UI context
    pub menu_events_emitted: AtomicU64,

    /// Menu events dropped because the UI context was gone
    pub menu_events_dropped: AtomicU64,

    /// Effective state mutations
    pub state_updates: AtomicU64,

    /// State change notifications sent
    pub state_broadcasts: AtomicU64,

    /// Notifications sent while nobody was subscribed
    pub broadcasts_without_receivers: AtomicU64,

    start_time: Instant,
}

impl BridgeMetrics {
    pub fn new() -> Self {
        Self {
            requests_handled: AtomicU64::new(0),
            request_failures: AtomicU64::new(0),
            menu_events_emitted: AtomicU64::new(0),
            menu_events_dropped: AtomicU64::new(0),
            state_updates: AtomicU64::new(0),
            state_broadcasts: AtomicU64::new(0),
            broadcasts_without_receivers: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a handled bridge request
    pub fn record_request(&self, succeeded: bool) {
        if succeeded {
            self.requests_handled.fetch_add(1, Ordering::Relaxed);
        } else {
            self.request_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_menu_event(&self) {
        self.menu_events_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_menu_event_dropped(&self) {
        self.menu_events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_state_update(&self) {
        self.state_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_state_broadcast(&self) {
        self.state_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast_without_receivers(&self) {
        self.broadcasts_without_receivers
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Bridge Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Bridge requests: {} handled, {} failed",
            self.requests_handled.load(Ordering::Relaxed),
            self.request_failures.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Menu events: {} emitted, {} dropped",
            self.menu_events_emitted.load(Ordering::Relaxed),
            self.menu_events_dropped.load(Ordering::Relaxed)
        );
        tracing::info!(
            "State updates: {}, broadcasts: {}, without receivers: {}",
            self.state_updates.load(Ordering::Relaxed),
            self.state_broadcasts.load(Ordering::Relaxed),
            self.broadcasts_without_receivers.load(Ordering::Relaxed)
        );
    }
}

impl Default for BridgeMetrics {
    fn default() -> Self {
        Self::new()
    }
}
