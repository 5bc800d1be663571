//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seathub_core::types::record::OverageCharge;
use seathub_core::types::status::PoolStatus;
use seathub_realtime::metrics::MetricsSnapshot;

/// Borrow response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowResponse {
    /// Issued borrow id.
    pub id: String,
    /// Tool the seat came from.
    pub tool: String,
    /// Holder identity.
    pub user: String,
    /// Checkout timestamp.
    pub borrowed_at: DateTime<Utc>,
    /// Whether the seat came from the overage allowance.
    pub is_overage: bool,
}

/// Return response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Tool the seat went back to.
    pub tool: String,
}

/// Budget listing body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetListResponse {
    /// Every pool's current configuration and counters.
    pub tools: Vec<PoolStatus>,
}

/// Overage charge listing body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeListResponse {
    /// Matching charges, newest first.
    pub charges: Vec<OverageCharge>,
}

/// Health response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Registered pool count.
    pub pools: usize,
    /// Connected streaming session count.
    pub sessions: usize,
}

/// Version response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    /// Server version.
    pub version: String,
}

/// Stream metrics response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamMetricsResponse {
    /// Current stream metrics counters.
    pub stream: MetricsSnapshot,
    /// Events currently buffered.
    pub buffered_events: usize,
}
