//! # seathub-telemetry
//!
//! Observational side of the pool engine:
//!
//! - Bounded per-category event buffers with retention pruning and hard
//!   element caps
//! - Per-pool minute-bucketed borrow series with distinct-holder sets
//! - On-demand per-minute rate and overage-percentage aggregation
//! - Snapshot composition for the streaming subsystem
//!
//! Everything here is best-effort: telemetry failures never propagate into
//! the ledger operations they observe.

pub mod buffer;
pub mod rates;
pub mod series;
pub mod snapshot;

pub use buffer::EventBuffer;
pub use rates::RateAggregator;
pub use series::MinuteBucket;
pub use snapshot::{Snapshot, SnapshotComposer};
