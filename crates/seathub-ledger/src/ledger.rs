//! Pool registry with per-pool critical sections and the outstanding-borrow index.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use seathub_core::config::pool::PoolSeed;
use seathub_core::error::AppError;
use seathub_core::events::PoolEvent;
use seathub_core::events::pool::{FAILURE_MAX_OVERAGE, FAILURE_UNKNOWN_TOOL};
use seathub_core::result::AppResult;
use seathub_core::traits::{BorrowStore, EventSink};
use seathub_core::types::id::{BorrowId, ChargeId};
use seathub_core::types::record::{BorrowRecord, OverageCharge};
use seathub_core::types::status::PoolStatus;

use crate::pool::{BorrowDecision, PoolState};

/// Result of a successful borrow.
#[derive(Debug, Clone)]
pub struct BorrowGrant {
    /// Borrow identifier, needed to return the seat.
    pub id: BorrowId,
    /// Tool the seat came from.
    pub tool: String,
    /// Holder identity.
    pub user: String,
    /// Checkout timestamp.
    pub borrowed_at: DateTime<Utc>,
    /// Whether the seat came from the overage allowance.
    pub is_overage: bool,
}

/// Result of a successful return.
#[derive(Debug, Clone)]
pub struct ReturnReceipt {
    /// Tool the seat went back to.
    pub tool: String,
}

/// One outstanding checkout, indexed by borrow id.
#[derive(Debug, Clone)]
struct Outstanding {
    tool: String,
    user: String,
    borrowed_at: DateTime<Utc>,
    is_overage: bool,
}

/// Authoritative registry of all license pools.
///
/// Each pool's counters are guarded by their own mutex so unrelated pools
/// never serialize each other. Event appends and store writes happen after
/// the pool lock is released: an event may land in the buffer moments after
/// the state it describes, which is acceptable for observational data.
pub struct PoolLedger {
    /// Tool name → pool state under its own lock.
    pools: DashMap<String, Arc<Mutex<PoolState>>>,
    /// Outstanding borrows by id.
    borrows: DashMap<BorrowId, Outstanding>,
    /// Historical record store.
    store: Arc<dyn BorrowStore>,
    /// Observation sink.
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for PoolLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolLedger")
            .field("pools", &self.pools.len())
            .field("outstanding", &self.borrows.len())
            .finish()
    }
}

impl PoolLedger {
    /// Create an empty ledger.
    pub fn new(store: Arc<dyn BorrowStore>, events: Arc<dyn EventSink>) -> Self {
        Self {
            pools: DashMap::new(),
            borrows: DashMap::new(),
            store,
            events,
        }
    }

    /// Create a ledger pre-populated from seed configuration.
    pub fn with_seeds(
        seeds: &[PoolSeed],
        store: Arc<dyn BorrowStore>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let ledger = Self::new(store, events);
        for seed in seeds {
            ledger
                .pools
                .insert(seed.tool.clone(), Arc::new(Mutex::new(PoolState::from_seed(seed))));
        }
        info!(pools = seeds.len(), "Pool ledger seeded");
        ledger
    }

    fn pool(&self, tool: &str) -> Option<Arc<Mutex<PoolState>>> {
        self.pools.get(tool).map(|entry| Arc::clone(entry.value()))
    }

    /// Allocate one seat for `user` from `tool`'s pool.
    ///
    /// Fails with `CapacityExceeded` when the pool is at total capacity or
    /// its overage allowance is used up, and `NotFound` for an unknown or
    /// deactivated tool.
    pub async fn borrow(&self, tool: &str, user: &str) -> AppResult<BorrowGrant> {
        let Some(pool) = self.pool(tool) else {
            self.events
                .record(PoolEvent::failure(tool, user, FAILURE_UNKNOWN_TOOL, false));
            return Err(AppError::not_found(format!("Unknown tool: {tool}")));
        };

        // Critical section: capacity check + counter update only. The guard
        // must never live across an await.
        let (decision, overage_price) = {
            let mut state = pool.lock().await;
            if !state.active {
                drop(state);
                self.events
                    .record(PoolEvent::failure(tool, user, FAILURE_UNKNOWN_TOOL, false));
                return Err(AppError::not_found(format!("Tool is deactivated: {tool}")));
            }
            (state.try_borrow(), state.overage_price)
        };

        match decision {
            BorrowDecision::Refused { reason } => {
                warn!(tool = %tool, user = %user, reason = %reason, "Borrow refused");
                self.events
                    .record(PoolEvent::failure(tool, user, reason, reason == FAILURE_MAX_OVERAGE));
                Err(AppError::capacity_exceeded(format!(
                    "No licenses available for {tool}"
                )))
            }
            BorrowDecision::Granted { is_overage } => {
                let grant = BorrowGrant {
                    id: BorrowId::new(),
                    tool: tool.to_string(),
                    user: user.to_string(),
                    borrowed_at: Utc::now(),
                    is_overage,
                };

                self.borrows.insert(
                    grant.id,
                    Outstanding {
                        tool: grant.tool.clone(),
                        user: grant.user.clone(),
                        borrowed_at: grant.borrowed_at,
                        is_overage,
                    },
                );

                info!(
                    tool = %tool,
                    user = %user,
                    borrow_id = %grant.id,
                    is_overage = is_overage,
                    "Borrow granted"
                );

                self.events.record(PoolEvent::borrow(tool, user, is_overage));
                self.persist_grant(&grant, overage_price).await;

                Ok(grant)
            }
        }
    }

    /// Best-effort persistence of the historical record and overage charge.
    async fn persist_grant(&self, grant: &BorrowGrant, overage_price: f64) {
        let record = BorrowRecord {
            id: grant.id,
            tool: grant.tool.clone(),
            user: grant.user.clone(),
            borrowed_at: grant.borrowed_at,
            returned_at: None,
            is_overage: grant.is_overage,
        };
        if let Err(e) = self.store.record_borrow(record).await {
            warn!(borrow_id = %grant.id, error = %e, "Failed to persist borrow record");
        }

        if grant.is_overage && overage_price > 0.0 {
            let charge = OverageCharge {
                id: ChargeId::new(),
                tool: grant.tool.clone(),
                borrow_id: grant.id,
                user: grant.user.clone(),
                charged_at: grant.borrowed_at,
                amount: overage_price,
            };
            if let Err(e) = self.store.record_charge(charge).await {
                warn!(borrow_id = %grant.id, error = %e, "Failed to persist overage charge");
            }
        }
    }

    /// Return a previously borrowed seat.
    ///
    /// Fails with `NotFound` if the id is not outstanding (already returned
    /// or never issued); the pool counter is never decremented below zero.
    pub async fn return_borrow(&self, id: BorrowId) -> AppResult<ReturnReceipt> {
        let Some((_, entry)) = self.borrows.remove(&id) else {
            warn!(borrow_id = %id, "Return refused, borrow not outstanding");
            return Err(AppError::not_found("Borrow record not found"));
        };

        let pool = self.pool(&entry.tool).ok_or_else(|| {
            AppError::internal(format!("Pool missing for outstanding borrow: {}", entry.tool))
        })?;

        {
            let mut state = pool.lock().await;
            state.release();
        }

        info!(borrow_id = %id, tool = %entry.tool, "Borrow returned");

        self.events
            .record(PoolEvent::returned(entry.tool.clone(), entry.user.clone()));

        if let Err(e) = self.store.complete_return(&id).await {
            warn!(borrow_id = %id, error = %e, "Failed to persist return");
        }

        Ok(ReturnReceipt { tool: entry.tool })
    }

    /// Current status of one pool.
    pub async fn status(&self, tool: &str) -> AppResult<PoolStatus> {
        let pool = self
            .pool(tool)
            .ok_or_else(|| AppError::not_found(format!("Unknown tool: {tool}")))?;
        let state = pool.lock().await;
        Ok(state.status())
    }

    /// Current status of every pool, sorted by tool name.
    ///
    /// Each pool is read under its own short critical section, one at a
    /// time; the combined view is not a cross-pool atomic point.
    pub async fn status_all(&self) -> Vec<PoolStatus> {
        let pools: Vec<Arc<Mutex<PoolState>>> = self
            .pools
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut statuses = Vec::with_capacity(pools.len());
        for pool in pools {
            let state = pool.lock().await;
            statuses.push(state.status());
        }
        statuses.sort_by(|a, b| a.tool.cmp(&b.tool));
        statuses
    }

    /// Outstanding borrows, newest first, optionally filtered by holder.
    pub fn outstanding(&self, user: Option<&str>) -> Vec<BorrowRecord> {
        let mut records: Vec<BorrowRecord> = self
            .borrows
            .iter()
            .filter(|entry| user.is_none_or(|u| entry.value().user == u))
            .map(|entry| BorrowRecord {
                id: *entry.key(),
                tool: entry.value().tool.clone(),
                user: entry.value().user.clone(),
                borrowed_at: entry.value().borrowed_at,
                returned_at: None,
                is_overage: entry.value().is_overage,
            })
            .collect();
        records.sort_by(|a, b| b.borrowed_at.cmp(&a.borrowed_at));
        records
    }

    /// Overage charges from the store, optionally filtered by tool.
    pub async fn overage_charges(&self, tool: Option<&str>) -> AppResult<Vec<OverageCharge>> {
        self.store.list_charges(tool).await
    }

    /// Administratively create a new pool.
    pub async fn provision(&self, seed: &PoolSeed) -> AppResult<PoolStatus> {
        if self.pools.contains_key(&seed.tool) {
            return Err(AppError::conflict(format!(
                "Tool already exists: {}",
                seed.tool
            )));
        }

        let state = PoolState::from_seed(seed);
        let status = state.status();
        self.pools
            .insert(seed.tool.clone(), Arc::new(Mutex::new(state)));
        info!(tool = %seed.tool, total = seed.total, "Pool provisioned");
        Ok(status)
    }

    /// Update a pool's budget configuration.
    ///
    /// Refuses to reduce `total` below the number of currently outstanding
    /// borrows.
    pub async fn update_budget(&self, seed: &PoolSeed) -> AppResult<PoolStatus> {
        let pool = self
            .pool(&seed.tool)
            .ok_or_else(|| AppError::not_found(format!("Unknown tool: {}", seed.tool)))?;

        let mut state = pool.lock().await;
        if state.borrowed > seed.total {
            return Err(AppError::conflict(format!(
                "Total cannot be reduced below current borrows ({})",
                state.borrowed
            )));
        }

        state.total = seed.total;
        state.commit = seed.commit;
        state.max_overage = seed.max_overage;
        state.commit_price = seed.commit_price;
        state.overage_price = seed.overage_price_per_license;

        info!(
            tool = %seed.tool,
            total = seed.total,
            commit = seed.commit,
            max_overage = seed.max_overage,
            "Budget updated"
        );

        Ok(state.status())
    }

    /// Soft-deactivate a pool: borrows are refused, status reads and
    /// returns keep working until outstanding borrows drain.
    pub async fn deactivate(&self, tool: &str) -> AppResult<()> {
        let pool = self
            .pool(tool)
            .ok_or_else(|| AppError::not_found(format!("Unknown tool: {tool}")))?;

        let mut state = pool.lock().await;
        state.active = false;
        info!(tool = %tool, outstanding = state.borrowed, "Pool deactivated");
        Ok(())
    }

    /// Number of registered pools.
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Number of outstanding borrows across all pools.
    pub fn outstanding_count(&self) -> usize {
        self.borrows.len()
    }
}
