//! Pool observation events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure reason recorded when a borrow attempt is refused because the
/// pool has no seats left.
pub const FAILURE_EXHAUSTED: &str = "exhausted";
/// Failure reason recorded when the overage allowance is used up.
pub const FAILURE_MAX_OVERAGE: &str = "max_overage";
/// Failure reason recorded for a borrow against an unknown or inactive tool.
pub const FAILURE_UNKNOWN_TOOL: &str = "unknown_tool";

/// Category of a pool event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A seat was checked out.
    Borrow,
    /// A seat was returned.
    Return,
    /// A borrow attempt was refused.
    Failure,
}

/// One observation of a ledger mutation (or refused mutation).
///
/// Events for a given pool are appended in the order their ledger
/// mutations committed; they carry enough context for rate and
/// minute-bucket aggregation but are pruned after the retention window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Event category.
    pub kind: EventKind,
    /// Tool identifier (pool name).
    pub tool: String,
    /// Holder identity.
    pub user: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Whether the checkout was (or would have been) beyond the commit.
    pub is_overage: bool,
    /// Failure reason, present on `Failure` events only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl PoolEvent {
    /// Build a borrow event.
    pub fn borrow(tool: impl Into<String>, user: impl Into<String>, is_overage: bool) -> Self {
        Self {
            kind: EventKind::Borrow,
            tool: tool.into(),
            user: user.into(),
            timestamp: Utc::now(),
            is_overage,
            failure_reason: None,
        }
    }

    /// Build a return event.
    pub fn returned(tool: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Return,
            tool: tool.into(),
            user: user.into(),
            timestamp: Utc::now(),
            is_overage: false,
            failure_reason: None,
        }
    }

    /// Build a failure event.
    pub fn failure(
        tool: impl Into<String>,
        user: impl Into<String>,
        reason: &str,
        is_overage: bool,
    ) -> Self {
        Self {
            kind: EventKind::Failure,
            tool: tool.into(),
            user: user.into(),
            timestamp: Utc::now(),
            is_overage,
            failure_reason: Some(reason.to_string()),
        }
    }
}
