//! Bounded-duration event buffers and the minute-bucket series.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use seathub_core::config::telemetry::TelemetryConfig;
use seathub_core::events::{EventKind, PoolEvent};
use seathub_core::traits::EventSink;

use crate::series::{MinuteBucket, minute_floor};

/// Per-category event logs plus the per-pool minute series.
///
/// Buffers are ordered oldest-to-newest, so retention pruning is a cheap
/// prefix trim. Each category additionally caps at a maximum element count
/// so a traffic burst cannot grow memory unbounded within the retention
/// window; when the cap is hit the oldest elements are dropped regardless
/// of age.
///
/// All critical sections are short and synchronous, and independent of the
/// ledger's pool locks: a ledger lock is never held while a buffer lock is
/// acquired.
#[derive(Debug)]
pub struct EventBuffer {
    config: TelemetryConfig,
    borrows: Mutex<VecDeque<PoolEvent>>,
    returns: Mutex<VecDeque<PoolEvent>>,
    failures: Mutex<VecDeque<PoolEvent>>,
    /// Tool name → minute start (epoch seconds) → bucket.
    series: DashMap<String, BTreeMap<i64, MinuteBucket>>,
}

fn lock(queue: &Mutex<VecDeque<PoolEvent>>) -> MutexGuard<'_, VecDeque<PoolEvent>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EventBuffer {
    /// Create an empty buffer with the given retention policy.
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            borrows: Mutex::new(VecDeque::new()),
            returns: Mutex::new(VecDeque::new()),
            failures: Mutex::new(VecDeque::new()),
            series: DashMap::new(),
        }
    }

    fn queue(&self, kind: EventKind) -> &Mutex<VecDeque<PoolEvent>> {
        match kind {
            EventKind::Borrow => &self.borrows,
            EventKind::Return => &self.returns,
            EventKind::Failure => &self.failures,
        }
    }

    fn retention_cutoff(&self) -> DateTime<Utc> {
        Utc::now() - Duration::seconds(self.config.retention_seconds as i64)
    }

    /// Events of one category with `timestamp >= since`, oldest first.
    pub fn recent(&self, kind: EventKind, since: DateTime<Utc>) -> Vec<PoolEvent> {
        let queue = lock(self.queue(kind));
        queue
            .iter()
            .filter(|e| e.timestamp >= since)
            .cloned()
            .collect()
    }

    /// Retention-trimmed minute series for one pool, oldest first.
    pub fn series_for(&self, tool: &str) -> Vec<MinuteBucket> {
        let cutoff = minute_floor(self.retention_cutoff());
        self.series
            .get(tool)
            .map(|buckets| {
                buckets
                    .range(cutoff..)
                    .map(|(_, bucket)| bucket.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Retention-trimmed minute series for every pool with borrow activity.
    pub fn series_all(&self) -> BTreeMap<String, Vec<MinuteBucket>> {
        let cutoff = minute_floor(self.retention_cutoff());
        self.series
            .iter()
            .map(|entry| {
                let buckets = entry
                    .value()
                    .range(cutoff..)
                    .map(|(_, bucket)| bucket.clone())
                    .collect();
                (entry.key().clone(), buckets)
            })
            .collect()
    }

    /// Current number of buffered events across all categories.
    pub fn total_events(&self) -> usize {
        lock(&self.borrows).len() + lock(&self.returns).len() + lock(&self.failures).len()
    }

    fn update_bucket(&self, event: &PoolEvent) {
        let minute = minute_floor(event.timestamp);
        let mut buckets = self.series.entry(event.tool.clone()).or_default();

        buckets
            .entry(minute)
            .or_insert_with(|| {
                MinuteBucket::new(
                    DateTime::from_timestamp(minute, 0).unwrap_or(event.timestamp),
                )
            })
            .observe(&event.user, event.is_overage);

        // Prefix trim: everything below the cutoff minute is expired.
        let cutoff = minute_floor(self.retention_cutoff());
        let keep = buckets.split_off(&cutoff);
        *buckets = keep;
    }

    fn prune_queue(queue: &mut VecDeque<PoolEvent>, cutoff: DateTime<Utc>, cap: usize) {
        while let Some(front) = queue.front() {
            if front.timestamp >= cutoff {
                break;
            }
            queue.pop_front();
        }
        while queue.len() > cap {
            queue.pop_front();
        }
    }
}

impl EventSink for EventBuffer {
    /// Append one event and prune.
    ///
    /// Infallible by contract: buffering is best-effort observability and
    /// must never fail the ledger operation that produced the event.
    fn record(&self, event: PoolEvent) {
        if event.kind == EventKind::Borrow {
            self.update_bucket(&event);
        }

        let cutoff = self.retention_cutoff();
        let cap = self.config.max_events_per_category;
        let mut queue = lock(self.queue(event.kind));
        queue.push_back(event);
        Self::prune_queue(&mut queue, cutoff, cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(retention_seconds: u64, cap: usize) -> EventBuffer {
        EventBuffer::new(TelemetryConfig {
            retention_seconds,
            max_events_per_category: cap,
            ..TelemetryConfig::default()
        })
    }

    fn aged_event(kind: EventKind, age_seconds: i64) -> PoolEvent {
        let mut event = match kind {
            EventKind::Borrow => PoolEvent::borrow("cad_tool", "alice", false),
            EventKind::Return => PoolEvent::returned("cad_tool", "alice"),
            EventKind::Failure => PoolEvent::failure("cad_tool", "alice", "exhausted", false),
        };
        event.timestamp = Utc::now() - Duration::seconds(age_seconds);
        event
    }

    #[test]
    fn test_expired_events_are_pruned_on_record() {
        let buffer = buffer_with(3600, 100);

        buffer.record(aged_event(EventKind::Borrow, 7200));
        buffer.record(aged_event(EventKind::Borrow, 0));

        let events = buffer.recent(EventKind::Borrow, Utc::now() - Duration::hours(4));
        assert_eq!(events.len(), 1);
        assert_eq!(buffer.total_events(), 1);
    }

    #[test]
    fn test_element_cap_drops_oldest_regardless_of_age() {
        let buffer = buffer_with(3600, 3);

        for i in 0..10 {
            buffer.record(aged_event(EventKind::Return, 10 - i));
        }

        assert_eq!(buffer.total_events(), 3);
        let events = buffer.recent(EventKind::Return, Utc::now() - Duration::hours(1));
        // Oldest-first ordering survives the trim.
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_categories_are_independent() {
        let buffer = buffer_with(3600, 100);
        buffer.record(aged_event(EventKind::Borrow, 0));
        buffer.record(aged_event(EventKind::Failure, 0));

        let since = Utc::now() - Duration::minutes(5);
        assert_eq!(buffer.recent(EventKind::Borrow, since).len(), 1);
        assert_eq!(buffer.recent(EventKind::Return, since).len(), 0);
        assert_eq!(buffer.recent(EventKind::Failure, since).len(), 1);
    }

    #[test]
    fn test_borrow_events_feed_minute_series() {
        let buffer = buffer_with(3600, 100);

        buffer.record(PoolEvent::borrow("cad_tool", "alice", false));
        buffer.record(PoolEvent::borrow("cad_tool", "bob", true));
        buffer.record(PoolEvent::returned("cad_tool", "alice"));

        let series = buffer.series_for("cad_tool");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].count, 2);
        assert_eq!(series[0].overage_count, 1);
        assert_eq!(series[0].users.len(), 2);

        // Returns do not create buckets.
        assert!(buffer.series_for("unknown").is_empty());
    }

    #[test]
    fn test_series_respects_retention() {
        let buffer = buffer_with(600, 100);

        buffer.record(aged_event(EventKind::Borrow, 1200));
        buffer.record(aged_event(EventKind::Borrow, 0));

        let series = buffer.series_for("cad_tool");
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_recent_is_oldest_first() {
        let buffer = buffer_with(3600, 100);
        for age in [30, 20, 10] {
            buffer.record(aged_event(EventKind::Borrow, age));
        }

        let events = buffer.recent(EventKind::Borrow, Utc::now() - Duration::minutes(1));
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
