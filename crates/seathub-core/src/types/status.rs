//! Pool status wire shape.

use serde::{Deserialize, Serialize};

/// Snapshot of one license pool's counters and pricing.
///
/// This is the shape returned by the status endpoints and embedded in the
/// `tools` array of every streamed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Tool identifier (pool name).
    pub tool: String,
    /// Total seats in the pool.
    pub total: u32,
    /// Seats currently checked out.
    pub borrowed: u32,
    /// Seats available for checkout.
    pub available: u32,
    /// Committed seat quantity.
    pub commit: u32,
    /// Maximum overage seats allowed.
    pub max_overage: u32,
    /// Overage seats currently in use (`max(0, borrowed - commit)`).
    pub overage: u32,
    /// Cumulative count of overage checkouts (never decreases).
    pub overage_borrows: u64,
    /// Whether the pool is currently within its committed quantity.
    pub in_commit: bool,
    /// Fixed fee for the committed quantity.
    pub commit_price: f64,
    /// Per-seat price for each overage checkout.
    pub overage_price_per_license: f64,
    /// Accrued overage cost (`overage_borrows * overage_price_per_license`).
    pub current_overage_cost: f64,
    /// Commit fee plus accrued overage cost.
    pub total_cost: f64,
}
