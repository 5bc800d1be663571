//! On-demand rate and overage-percentage aggregation.

use std::sync::Arc;

use chrono::{Duration, Utc};

use seathub_core::events::EventKind;

use crate::buffer::EventBuffer;

/// Derives per-minute rates and percentages from buffer contents at call
/// time. Carries no state of its own.
#[derive(Debug, Clone)]
pub struct RateAggregator {
    buffer: Arc<EventBuffer>,
}

impl RateAggregator {
    /// Create an aggregator over the given buffer.
    pub fn new(buffer: Arc<EventBuffer>) -> Self {
        Self { buffer }
    }

    /// Events of `kind` in the last `window_seconds`, normalized to a
    /// per-minute rate.
    pub fn rate_per_minute(&self, kind: EventKind, window_seconds: u64) -> f64 {
        if window_seconds == 0 {
            return 0.0;
        }
        let since = Utc::now() - Duration::seconds(window_seconds as i64);
        let count = self.buffer.recent(kind, since).len();
        count as f64 / (window_seconds as f64 / 60.0)
    }

    /// Overage-flagged borrows as a percentage of all borrows in the last
    /// `window_seconds`. Returns 0 when there are no borrow events.
    pub fn overage_percent(&self, window_seconds: u64) -> f64 {
        let since = Utc::now() - Duration::seconds(window_seconds as i64);
        let borrows = self.buffer.recent(EventKind::Borrow, since);
        if borrows.is_empty() {
            return 0.0;
        }
        let overage = borrows.iter().filter(|e| e.is_overage).count();
        overage as f64 / borrows.len() as f64 * 100.0
    }
}
