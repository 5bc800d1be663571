//! Application state shared across all handlers.

use std::sync::Arc;

use seathub_core::config::AppConfig;
use seathub_ledger::PoolLedger;
use seathub_realtime::RealtimeEngine;
use seathub_telemetry::{EventBuffer, SnapshotComposer};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Authoritative pool ledger.
    pub ledger: Arc<PoolLedger>,
    /// Telemetry event buffer.
    pub buffer: Arc<EventBuffer>,
    /// Snapshot composer (used for the initial frame on stream connect).
    pub composer: Arc<SnapshotComposer>,
    /// Streaming engine.
    pub realtime: RealtimeEngine,
}
