//! Domain events emitted by ledger operations.
//!
//! Events are observational: they are appended to the telemetry buffer on
//! the same call path as the ledger mutation they describe, and are never
//! authoritative for pool state.

pub mod pool;

pub use pool::{EventKind, PoolEvent};
