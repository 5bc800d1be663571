//! Snapshot streaming configuration.

use serde::{Deserialize, Serialize};

/// Snapshot publisher and streaming session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Snapshot publish cadence in milliseconds.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_ms: u64,
    /// Outbound queue depth per session, in snapshots. A session whose
    /// queue is full when the next snapshot arrives is dropped.
    #[serde(default = "default_session_buffer")]
    pub session_buffer_snapshots: usize,
    /// Maximum concurrently connected sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            snapshot_interval_ms: default_snapshot_interval(),
            session_buffer_snapshots: default_session_buffer(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_snapshot_interval() -> u64 {
    1_000
}

fn default_session_buffer() -> usize {
    8
}

fn default_max_sessions() -> usize {
    256
}
