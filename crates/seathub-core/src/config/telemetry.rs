//! Event buffer and rate aggregation configuration.

use serde::{Deserialize, Serialize};

/// Telemetry buffering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// How long buffered events and minute buckets are retained, in seconds.
    #[serde(default = "default_retention")]
    pub retention_seconds: u64,
    /// Hard cap on buffered events per category, independent of age.
    #[serde(default = "default_max_events")]
    pub max_events_per_category: usize,
    /// Lookback window for the `recent_events` section of a snapshot, in seconds.
    #[serde(default = "default_recent_lookback")]
    pub recent_lookback_seconds: u64,
    /// Window used for per-minute rate calculations, in seconds.
    #[serde(default = "default_rate_window")]
    pub rate_window_seconds: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            retention_seconds: default_retention(),
            max_events_per_category: default_max_events(),
            recent_lookback_seconds: default_recent_lookback(),
            rate_window_seconds: default_rate_window(),
        }
    }
}

fn default_retention() -> u64 {
    21_600
}

fn default_max_events() -> usize {
    10_000
}

fn default_recent_lookback() -> u64 {
    300
}

fn default_rate_window() -> u64 {
    60
}
