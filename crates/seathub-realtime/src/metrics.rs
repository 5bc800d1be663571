//! Streaming engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct StreamMetrics {
    /// Total snapshots published.
    pub snapshots_published: AtomicU64,
    /// Total snapshot messages delivered to sessions.
    pub messages_sent: AtomicU64,
    /// Total sessions ever registered.
    pub sessions_opened: AtomicU64,
    /// Total sessions dropped (slow, closed, or unsubscribed).
    pub sessions_dropped: AtomicU64,
}

impl StreamMetrics {
    /// Create new zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one published snapshot.
    pub fn snapshot_published(&self) {
        self.snapshots_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Record delivered snapshot messages.
    pub fn messages_sent_count(&self, count: u64) {
        self.messages_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one registered session.
    pub fn session_opened(&self) {
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record dropped sessions.
    pub fn sessions_dropped_count(&self, count: u64) {
        self.sessions_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            snapshots_published: self.snapshots_published.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            sessions_opened: self.sessions_opened.load(Ordering::Relaxed),
            sessions_dropped: self.sessions_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total snapshots published.
    pub snapshots_published: u64,
    /// Total snapshot messages delivered.
    pub messages_sent: u64,
    /// Total sessions ever registered.
    pub sessions_opened: u64,
    /// Total sessions dropped.
    pub sessions_dropped: u64,
}
