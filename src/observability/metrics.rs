//! Counters for the rangefeed tasks
//!
//! - Counters only, monotonic
//! - Shared by every task of one processor
//! - Relaxed atomics; exactness across threads is not required

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for one processor's tasks
#[derive(Debug, Default)]
pub struct RangefeedMetrics {
    /// Distinct transactions reported by initial scans
    intents_discovered: AtomicU64,
    /// Values delivered by catch-up scans
    values_replayed: AtomicU64,
    /// Push attempts that reached the pusher
    push_attempts: AtomicU64,
    /// Push attempts that failed
    push_failures: AtomicU64,
    /// Transactions handed to intent cleanup
    cleanups_requested: AtomicU64,
    /// Cleanup submissions that failed
    cleanup_failures: AtomicU64,
    /// Scans that failed
    scan_failures: AtomicU64,
    /// Tasks that observed cancellation
    cancellations: AtomicU64,
}

impl RangefeedMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Add discovered transactions
    pub fn add_intents_discovered(&self, n: u64) {
        self.intents_discovered.fetch_add(n, Ordering::Relaxed);
    }

    /// Increment replayed values
    pub fn increment_values_replayed(&self) {
        self.values_replayed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment push attempts
    pub fn increment_push_attempts(&self) {
        self.push_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment push failures
    pub fn increment_push_failures(&self) {
        self.push_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Add transactions handed to cleanup
    pub fn add_cleanups_requested(&self, n: u64) {
        self.cleanups_requested.fetch_add(n, Ordering::Relaxed);
    }

    /// Increment cleanup failures
    pub fn increment_cleanup_failures(&self) {
        self.cleanup_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment scan failures
    pub fn increment_scan_failures(&self) {
        self.scan_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment cancellations
    pub fn increment_cancellations(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            intents_discovered: self.intents_discovered.load(Ordering::Relaxed),
            values_replayed: self.values_replayed.load(Ordering::Relaxed),
            push_attempts: self.push_attempts.load(Ordering::Relaxed),
            push_failures: self.push_failures.load(Ordering::Relaxed),
            cleanups_requested: self.cleanups_requested.load(Ordering::Relaxed),
            cleanup_failures: self.cleanup_failures.load(Ordering::Relaxed),
            scan_failures: self.scan_failures.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub intents_discovered: u64,
    pub values_replayed: u64,
    pub push_attempts: u64,
    pub push_failures: u64,
    pub cleanups_requested: u64,
    pub cleanup_failures: u64,
    pub scan_failures: u64,
    pub cancellations: u64,
}
