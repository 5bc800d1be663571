//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use seathub_core::config::pool::PoolSeed;

/// Borrow request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BorrowRequest {
    /// Tool to borrow a seat from.
    #[validate(length(min = 1, message = "Tool is required"))]
    pub tool: String,
    /// Holder identity.
    #[validate(length(min = 1, message = "User is required"))]
    pub user: String,
}

/// Return request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReturnRequest {
    /// Borrow id issued at checkout.
    #[validate(length(min = 1, message = "Borrow id is required"))]
    pub id: String,
}

/// Budget configuration body, used both for updates and provisioning.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BudgetConfigRequest {
    /// Tool identifier.
    #[validate(length(min = 1, message = "Tool is required"))]
    pub tool: String,
    /// Total seats.
    #[validate(range(min = 1))]
    pub total: u32,
    /// Committed seat quantity.
    pub commit: u32,
    /// Maximum overage seats.
    pub max_overage: u32,
    /// Fixed fee for the committed quantity.
    #[validate(range(min = 0.0))]
    pub commit_price: f64,
    /// Per-seat overage price.
    #[validate(range(min = 0.0))]
    pub overage_price_per_license: f64,
}

impl BudgetConfigRequest {
    /// Convert into the ledger's seed shape.
    pub fn into_seed(self) -> PoolSeed {
        PoolSeed {
            tool: self.tool,
            total: self.total,
            commit: self.commit,
            max_overage: self.max_overage,
            commit_price: self.commit_price,
            overage_price_per_license: self.overage_price_per_license,
        }
    }
}

/// Query parameters for the borrow listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BorrowListQuery {
    /// Restrict to one holder.
    pub user: Option<String>,
}

/// Query parameters for the overage charge listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeListQuery {
    /// Restrict to one tool.
    pub tool: Option<String>,
}
