//! Snapshot model and composition.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use seathub_core::config::telemetry::TelemetryConfig;
use seathub_core::events::{EventKind, PoolEvent};
use seathub_core::types::PoolStatus;
use seathub_ledger::PoolLedger;

use crate::buffer::EventBuffer;
use crate::rates::RateAggregator;
use crate::series::MinuteBucket;

/// Derived per-minute rates included in every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSummary {
    /// Borrow events per minute over the rate window.
    pub borrow_per_min: f64,
    /// Return events per minute over the rate window.
    pub return_per_min: f64,
    /// Failure events per minute over the rate window.
    pub failure_per_min: f64,
    /// Overage borrows as a percentage of all borrows in the window.
    pub overage_percent: f64,
}

/// Short-lookback events included in every snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentEvents {
    /// Recent borrow events, oldest first.
    pub borrows: Vec<PoolEvent>,
}

/// Buffer occupancy counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferStats {
    /// Events currently buffered across all categories.
    pub total_events: usize,
}

/// One point-in-time view of all pools plus derived telemetry.
///
/// A snapshot is composed once per publisher tick and serialized once for
/// every connected session; clients always treat it as full state, never a
/// delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Status of every pool, sorted by tool name.
    pub tools: Vec<PoolStatus>,
    /// Derived rates.
    pub rates: RateSummary,
    /// Short-lookback events.
    pub recent_events: RecentEvents,
    /// Minute-bucketed borrow series per pool.
    pub tool_metrics: BTreeMap<String, Vec<MinuteBucket>>,
    /// Buffer occupancy.
    pub buffer_stats: BufferStats,
}

/// Composes snapshots from ledger and buffer state.
///
/// Each pool is read under its own short critical section, one pool at a
/// time; the result is consistent enough for a dashboard but is not a
/// single atomic cross-pool point.
#[derive(Debug, Clone)]
pub struct SnapshotComposer {
    ledger: Arc<PoolLedger>,
    buffer: Arc<EventBuffer>,
    rates: RateAggregator,
    config: TelemetryConfig,
}

impl SnapshotComposer {
    /// Create a composer over the given ledger and buffer.
    pub fn new(ledger: Arc<PoolLedger>, buffer: Arc<EventBuffer>, config: TelemetryConfig) -> Self {
        let rates = RateAggregator::new(Arc::clone(&buffer));
        Self {
            ledger,
            buffer,
            rates,
            config,
        }
    }

    /// Assemble one immutable snapshot of current state.
    pub async fn compose(&self) -> Snapshot {
        let window = self.config.rate_window_seconds;
        let lookback = Utc::now() - Duration::seconds(self.config.recent_lookback_seconds as i64);

        Snapshot {
            tools: self.ledger.status_all().await,
            rates: RateSummary {
                borrow_per_min: self.rates.rate_per_minute(EventKind::Borrow, window),
                return_per_min: self.rates.rate_per_minute(EventKind::Return, window),
                failure_per_min: self.rates.rate_per_minute(EventKind::Failure, window),
                overage_percent: self.rates.overage_percent(window),
            },
            recent_events: RecentEvents {
                borrows: self.buffer.recent(EventKind::Borrow, lookback),
            },
            tool_metrics: self.buffer.series_all(),
            buffer_stats: BufferStats {
                total_events: self.buffer.total_events(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seathub_core::config::pool::PoolSeed;
    use seathub_core::traits::EventSink;
    use seathub_ledger::MemoryBorrowStore;

    fn stack() -> (Arc<PoolLedger>, SnapshotComposer) {
        let buffer = Arc::new(EventBuffer::new(TelemetryConfig::default()));
        let ledger = Arc::new(PoolLedger::with_seeds(
            &[PoolSeed {
                tool: "cad_tool".to_string(),
                total: 20,
                commit: 5,
                max_overage: 15,
                commit_price: 5000.0,
                overage_price_per_license: 500.0,
            }],
            Arc::new(MemoryBorrowStore::new()),
            Arc::clone(&buffer) as Arc<dyn EventSink>,
        ));
        let composer =
            SnapshotComposer::new(Arc::clone(&ledger), buffer, TelemetryConfig::default());
        (ledger, composer)
    }

    #[tokio::test]
    async fn test_compose_reflects_ledger_and_buffer() {
        let (ledger, composer) = stack();

        for i in 0..6 {
            ledger.borrow("cad_tool", &format!("user{i}")).await.unwrap();
        }

        let snapshot = composer.compose().await;
        assert_eq!(snapshot.tools.len(), 1);
        assert_eq!(snapshot.tools[0].borrowed, 6);
        assert_eq!(snapshot.tools[0].overage, 1);
        assert_eq!(snapshot.recent_events.borrows.len(), 6);
        assert_eq!(snapshot.buffer_stats.total_events, 6);
        assert!(snapshot.rates.borrow_per_min > 0.0);
        assert!(snapshot.rates.overage_percent > 0.0);

        let series = snapshot.tool_metrics.get("cad_tool").expect("series");
        assert_eq!(series.iter().map(|b| b.count).sum::<u64>(), 6);
    }

    #[tokio::test]
    async fn test_snapshot_wire_shape() {
        let (ledger, composer) = stack();
        ledger.borrow("cad_tool", "alice").await.unwrap();

        let snapshot = composer.compose().await;
        let value = serde_json::to_value(&snapshot).expect("serialize");

        assert!(value["tools"].is_array());
        assert!(value["rates"]["borrow_per_min"].is_number());
        assert!(value["rates"]["overage_percent"].is_number());
        assert!(value["recent_events"]["borrows"].is_array());
        assert!(value["tool_metrics"]["cad_tool"].is_array());
        assert!(value["buffer_stats"]["total_events"].is_number());

        let bucket = &value["tool_metrics"]["cad_tool"][0];
        assert!(bucket["timestamp"].is_string());
        assert_eq!(bucket["count"], 1);
        assert_eq!(bucket["overage_count"], 0);
        assert_eq!(bucket["users"][0], "alice");

        // Snapshots round-trip for the client side.
        let parsed: Snapshot = serde_json::from_value(value).expect("deserialize");
        assert_eq!(parsed.tools[0].tool, "cad_tool");
    }

    #[tokio::test]
    async fn test_empty_system_composes_cleanly() {
        let (_ledger, composer) = stack();
        let snapshot = composer.compose().await;

        assert_eq!(snapshot.tools[0].borrowed, 0);
        assert_eq!(snapshot.rates.borrow_per_min, 0.0);
        assert_eq!(snapshot.rates.overage_percent, 0.0);
        assert!(snapshot.recent_events.borrows.is_empty());
        assert_eq!(snapshot.buffer_stats.total_events, 0);
    }
}
