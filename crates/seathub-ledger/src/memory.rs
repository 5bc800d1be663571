//! In-memory borrow store for single-node deployments.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use seathub_core::result::AppResult;
use seathub_core::traits::BorrowStore;
use seathub_core::types::id::BorrowId;
use seathub_core::types::record::{BorrowRecord, OverageCharge};

/// Internal state for the memory-based borrow store.
#[derive(Debug, Default)]
struct InnerState {
    /// Every checkout ever recorded, in append order.
    borrows: Vec<BorrowRecord>,
    /// Every overage charge ever recorded, in append order.
    charges: Vec<OverageCharge>,
}

/// In-memory [`BorrowStore`] using a Tokio mutex for thread safety.
///
/// Suitable for single-node deployments and tests; a durable backend would
/// implement the same trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryBorrowStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryBorrowStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BorrowStore for MemoryBorrowStore {
    async fn record_borrow(&self, record: BorrowRecord) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.borrows.push(record);
        Ok(())
    }

    async fn complete_return(&self, id: &BorrowId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(record) = state.borrows.iter_mut().rev().find(|r| r.id == *id) {
            record.returned_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn record_charge(&self, charge: OverageCharge) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.charges.push(charge);
        Ok(())
    }

    async fn list_charges(&self, tool: Option<&str>) -> AppResult<Vec<OverageCharge>> {
        let state = self.state.lock().await;
        let mut charges: Vec<OverageCharge> = state
            .charges
            .iter()
            .filter(|c| tool.is_none_or(|t| c.tool == t))
            .cloned()
            .collect();
        charges.sort_by(|a, b| b.charged_at.cmp(&a.charged_at));
        Ok(charges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seathub_core::types::id::ChargeId;

    fn record(tool: &str, user: &str) -> BorrowRecord {
        BorrowRecord {
            id: BorrowId::new(),
            tool: tool.to_string(),
            user: user.to_string(),
            borrowed_at: Utc::now(),
            returned_at: None,
            is_overage: false,
        }
    }

    #[tokio::test]
    async fn test_return_marks_record() {
        let store = MemoryBorrowStore::new();
        let rec = record("cad_tool", "alice");
        let id = rec.id;
        store.record_borrow(rec).await.unwrap();

        store.complete_return(&id).await.unwrap();

        let state = store.state.lock().await;
        assert!(state.borrows[0].returned_at.is_some());
    }

    #[tokio::test]
    async fn test_charges_filter_by_tool() {
        let store = MemoryBorrowStore::new();
        for tool in ["a", "a", "b"] {
            store
                .record_charge(OverageCharge {
                    id: ChargeId::new(),
                    tool: tool.to_string(),
                    borrow_id: BorrowId::new(),
                    user: "alice".to_string(),
                    charged_at: Utc::now(),
                    amount: 100.0,
                })
                .await
                .unwrap();
        }

        assert_eq!(store.list_charges(None).await.unwrap().len(), 3);
        assert_eq!(store.list_charges(Some("a")).await.unwrap().len(), 2);
    }
}
