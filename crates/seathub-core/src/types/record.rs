//! Historical record shapes owned by the borrow store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BorrowId, ChargeId};

/// One checkout, outstanding or returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowRecord {
    /// Borrow identifier.
    pub id: BorrowId,
    /// Tool the seat was borrowed from.
    pub tool: String,
    /// Holder identity.
    pub user: String,
    /// When the seat was checked out.
    pub borrowed_at: DateTime<Utc>,
    /// When the seat was returned, if it has been.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<DateTime<Utc>>,
    /// Whether the checkout was beyond the committed quantity.
    pub is_overage: bool,
}

/// One per-unit overage charge, accrued at checkout time.
///
/// Charges are never removed, even after the borrow is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverageCharge {
    /// Charge identifier.
    pub id: ChargeId,
    /// Tool the charge applies to.
    pub tool: String,
    /// Borrow that triggered the charge.
    pub borrow_id: BorrowId,
    /// Holder that was charged.
    pub user: String,
    /// When the charge accrued.
    pub charged_at: DateTime<Utc>,
    /// Charge amount (one overage unit price).
    pub amount: f64,
}
