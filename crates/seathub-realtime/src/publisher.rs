//! The snapshot publisher task.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, trace};

use seathub_core::config::realtime::RealtimeConfig;
use seathub_telemetry::SnapshotComposer;

use crate::metrics::StreamMetrics;
use crate::session::manager::SessionManager;

/// Spawn the periodic compose/broadcast loop.
///
/// One cycle at a time: the loop body runs compose and broadcast
/// sequentially, and missed ticks are skipped rather than queued, so a slow
/// composition bounds latency instead of building a backlog. The task exits
/// when the shutdown watch flips to `true`.
pub fn spawn_publisher(
    composer: Arc<SnapshotComposer>,
    sessions: Arc<SessionManager>,
    metrics: Arc<StreamMetrics>,
    config: RealtimeConfig,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(Duration::from_millis(config.snapshot_interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(
            interval_ms = config.snapshot_interval_ms,
            "Snapshot publisher started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let snapshot = composer.compose().await;
            let payload = match serde_json::to_string(&snapshot) {
                Ok(p) => p,
                Err(e) => {
                    error!(error = %e, "Failed to serialize snapshot");
                    continue;
                }
            };

            let report = sessions.broadcast(&payload);
            metrics.snapshot_published();
            metrics.messages_sent_count(report.delivered as u64);
            metrics.sessions_dropped_count(report.dropped as u64);

            trace!(
                delivered = report.delivered,
                dropped = report.dropped,
                bytes = payload.len(),
                "Snapshot broadcast"
            );
        }

        debug!("Snapshot publisher stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seathub_core::config::pool::PoolSeed;
    use seathub_core::config::telemetry::TelemetryConfig;
    use seathub_core::traits::EventSink;
    use seathub_ledger::{MemoryBorrowStore, PoolLedger};
    use seathub_telemetry::{EventBuffer, Snapshot};

    fn stack() -> (Arc<PoolLedger>, Arc<SnapshotComposer>) {
        let buffer = Arc::new(EventBuffer::new(TelemetryConfig::default()));
        let ledger = Arc::new(PoolLedger::with_seeds(
            &[PoolSeed {
                tool: "cad_tool".to_string(),
                total: 5,
                commit: 5,
                max_overage: 0,
                commit_price: 1000.0,
                overage_price_per_license: 0.0,
            }],
            Arc::new(MemoryBorrowStore::new()),
            Arc::clone(&buffer) as Arc<dyn EventSink>,
        ));
        let composer = Arc::new(SnapshotComposer::new(
            Arc::clone(&ledger),
            buffer,
            TelemetryConfig::default(),
        ));
        (ledger, composer)
    }

    #[tokio::test]
    async fn test_publisher_delivers_snapshots_in_tick_order() {
        let (ledger, composer) = stack();
        let config = RealtimeConfig {
            snapshot_interval_ms: 10,
            session_buffer_snapshots: 64,
            max_sessions: 16,
        };
        let sessions = Arc::new(SessionManager::new(config.clone()));
        let metrics = Arc::new(StreamMetrics::new());
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        let (_handle, mut rx) = sessions.subscribe().unwrap();
        let task = spawn_publisher(
            composer,
            Arc::clone(&sessions),
            Arc::clone(&metrics),
            config,
            shutdown_rx,
        );

        ledger.borrow("cad_tool", "alice").await.unwrap();

        let first: Snapshot =
            serde_json::from_str(&rx.recv().await.expect("first snapshot")).unwrap();
        let second: Snapshot =
            serde_json::from_str(&rx.recv().await.expect("second snapshot")).unwrap();

        // Counters never move backwards between consecutive ticks.
        assert!(second.tools[0].borrowed >= first.tools[0].borrowed);

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
        assert!(metrics.snapshot().snapshots_published >= 2);
    }

    #[tokio::test]
    async fn test_publisher_stops_on_shutdown() {
        let (_ledger, composer) = stack();
        let config = RealtimeConfig {
            snapshot_interval_ms: 10,
            session_buffer_snapshots: 8,
            max_sessions: 16,
        };
        let sessions = Arc::new(SessionManager::new(config.clone()));
        let metrics = Arc::new(StreamMetrics::new());
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        let task = spawn_publisher(composer, sessions, metrics, config, shutdown_rx);
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("publisher should stop promptly")
            .unwrap();
    }
}
