//! # seathub-realtime
//!
//! Push side of the telemetry pipeline:
//!
//! - Streaming session registry with bounded per-session outbound queues
//! - Broadcast fan-out that drops slow or disconnected observers instead of
//!   blocking on them
//! - The snapshot publisher task (fixed tick, skip-when-busy)
//! - Stream metrics counters
//!
//! Reconnection is entirely a client responsibility; a dropped session is
//! simply removed from the fan-out set.

pub mod engine;
pub mod metrics;
pub mod publisher;
pub mod session;

pub use engine::RealtimeEngine;
pub use metrics::StreamMetrics;
pub use publisher::spawn_publisher;
pub use session::manager::SessionManager;
