//! Narrow repository trait for historical borrow records.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::BorrowId;
use crate::types::record::{BorrowRecord, OverageCharge};

/// Durable store for borrow history and overage charges.
///
/// The ledger's in-memory index is authoritative for *outstanding* borrows;
/// this store owns the historical record. Write failures are logged by the
/// caller and never fail the ledger operation they accompany.
#[async_trait]
pub trait BorrowStore: Send + Sync + 'static {
    /// Persist a new checkout.
    async fn record_borrow(&self, record: BorrowRecord) -> AppResult<()>;

    /// Mark a checkout as returned.
    async fn complete_return(&self, id: &BorrowId) -> AppResult<()>;

    /// Persist one overage charge.
    async fn record_charge(&self, charge: OverageCharge) -> AppResult<()>;

    /// List overage charges, newest first, optionally filtered by tool.
    async fn list_charges(&self, tool: Option<&str>) -> AppResult<Vec<OverageCharge>>;
}
