//! License pool seed configuration.

use serde::{Deserialize, Serialize};

/// One license pool to create at startup.
///
/// `max_overage` follows the `total - commit` convention in the shipped
/// defaults, but is stored independently so a pool can be capped tighter
/// than its raw capacity would allow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSeed {
    /// Tool identifier (pool name).
    pub tool: String,
    /// Total seats in the pool.
    pub total: u32,
    /// Seats guaranteed at the fixed commit fee.
    #[serde(default)]
    pub commit: u32,
    /// Maximum seats usable beyond the commit quantity.
    #[serde(default)]
    pub max_overage: u32,
    /// Fixed fee for the committed quantity.
    #[serde(default)]
    pub commit_price: f64,
    /// Per-seat price for each overage checkout.
    #[serde(default)]
    pub overage_price_per_license: f64,
}
