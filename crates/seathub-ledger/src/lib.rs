//! # seathub-ledger
//!
//! Authoritative in-memory accounting for license seat pools:
//!
//! - Per-pool atomic borrow/return transitions (capacity check and counter
//!   update under one short critical section, never a global lock)
//! - Two-tier capacity policy: committed quantity plus bounded overage with
//!   per-unit cost accrual
//! - Outstanding-borrow index keyed by borrow id
//! - Budget administration (provision, budget update, soft-deactivate)
//! - In-memory [`seathub_core::traits::BorrowStore`] for single-node use

pub mod ledger;
pub mod memory;
pub mod pool;

pub use ledger::{BorrowGrant, PoolLedger, ReturnReceipt};
pub use memory::MemoryBorrowStore;
