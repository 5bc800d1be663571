//! Event sink trait for ledger observation.

use crate::events::PoolEvent;

/// Receiver for ledger observation events.
///
/// `record` is deliberately infallible and synchronous: a failure to buffer
/// an event must never prevent the ledger operation it accompanies from
/// succeeding. Implementations swallow and log their own errors.
pub trait EventSink: Send + Sync + 'static {
    /// Record one event.
    fn record(&self, event: PoolEvent);
}

/// Sink that discards every event. Useful for tests and tools that do not
/// run the telemetry subsystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: PoolEvent) {}
}
