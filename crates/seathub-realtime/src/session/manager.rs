//! Session registry and broadcast fan-out.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use seathub_core::config::realtime::RealtimeConfig;
use seathub_core::error::AppError;
use seathub_core::result::AppResult;
use seathub_core::types::id::SessionId;

use super::handle::{SendOutcome, SessionHandle};

/// Delivery counts for one broadcast cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Sessions that accepted the payload.
    pub delivered: usize,
    /// Sessions removed from the fan-out set this cycle.
    pub dropped: usize,
}

/// Tracks all connected streaming sessions.
///
/// Broadcasting never blocks on a session: one that cannot accept the next
/// snapshot (full queue or closed connection) is removed from the fan-out
/// set so a slow observer can never delay the others or the next compose
/// cycle.
#[derive(Debug)]
pub struct SessionManager {
    sessions: DashMap<SessionId, Arc<SessionHandle>>,
    config: RealtimeConfig,
}

impl SessionManager {
    /// Create an empty session manager.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }

    /// Register a new session.
    ///
    /// Returns the handle and the receiver for the session's delivery loop.
    pub fn subscribe(&self) -> AppResult<(Arc<SessionHandle>, mpsc::Receiver<String>)> {
        if self.sessions.len() >= self.config.max_sessions {
            warn!(
                sessions = self.sessions.len(),
                max = self.config.max_sessions,
                "Session limit reached, refusing subscription"
            );
            return Err(AppError::service_unavailable(
                "Too many connected streaming sessions",
            ));
        }

        let (tx, rx) = mpsc::channel(self.config.session_buffer_snapshots);
        let handle = Arc::new(SessionHandle::new(tx));
        self.sessions.insert(handle.id, Arc::clone(&handle));

        info!(session_id = %handle.id, "Streaming session registered");
        Ok((handle, rx))
    }

    /// Remove a session from the fan-out set.
    pub fn unsubscribe(&self, id: &SessionId) -> bool {
        if let Some((_, handle)) = self.sessions.remove(id) {
            handle.mark_closed();
            info!(session_id = %id, "Streaming session unregistered");
            true
        } else {
            false
        }
    }

    /// Push one serialized snapshot to every session.
    ///
    /// Sessions that report `Full` or `Closed` are dropped; delivery to the
    /// rest is unaffected.
    pub fn broadcast(&self, payload: &str) -> BroadcastReport {
        let handles: Vec<Arc<SessionHandle>> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut report = BroadcastReport::default();
        for handle in handles {
            match handle.push(payload.to_string()) {
                SendOutcome::Sent => report.delivered += 1,
                SendOutcome::Full => {
                    warn!(session_id = %handle.id, "Session queue full, dropping session");
                    handle.mark_closed();
                    self.sessions.remove(&handle.id);
                    report.dropped += 1;
                }
                SendOutcome::Closed => {
                    debug!(session_id = %handle.id, "Session closed, dropping session");
                    self.sessions.remove(&handle.id);
                    report.dropped += 1;
                }
            }
        }
        report
    }

    /// Close every session and clear the fan-out set.
    pub fn close_all(&self) {
        let count = self.sessions.len();
        for entry in self.sessions.iter() {
            entry.value().mark_closed();
        }
        self.sessions.clear();
        if count > 0 {
            info!(count = count, "All streaming sessions closed");
        }
    }

    /// Number of currently connected sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Whether a session is currently in the fan-out set.
    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(buffer: usize, max_sessions: usize) -> SessionManager {
        SessionManager::new(RealtimeConfig {
            snapshot_interval_ms: 1000,
            session_buffer_snapshots: buffer,
            max_sessions,
        })
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_sessions() {
        let manager = manager(4, 16);
        let (_h1, mut rx1) = manager.subscribe().unwrap();
        let (_h2, mut rx2) = manager.subscribe().unwrap();

        let report = manager.broadcast("{\"tick\":1}");
        assert_eq!(report.delivered, 2);
        assert_eq!(report.dropped, 0);

        assert_eq!(rx1.recv().await.as_deref(), Some("{\"tick\":1}"));
        assert_eq!(rx2.recv().await.as_deref(), Some("{\"tick\":1}"));
    }

    #[tokio::test]
    async fn test_slow_session_is_dropped_not_blocked() {
        let manager = manager(1, 16);
        let (slow, _slow_rx) = manager.subscribe().unwrap();
        let (_fast, mut fast_rx) = manager.subscribe().unwrap();

        // First broadcast fills the slow session's queue.
        assert_eq!(manager.broadcast("a").dropped, 0);
        let _ = fast_rx.recv().await;

        // Second broadcast finds it full and drops it.
        let report = manager.broadcast("b");
        assert_eq!(report.delivered, 1);
        assert_eq!(report.dropped, 1);
        assert!(!manager.contains(&slow.id));
        assert_eq!(manager.session_count(), 1);
    }

    #[tokio::test]
    async fn test_disconnected_session_removed_on_broadcast() {
        let manager = manager(4, 16);
        let (handle, rx) = manager.subscribe().unwrap();
        drop(rx);

        let report = manager.broadcast("a");
        assert_eq!(report.delivered, 0);
        assert_eq!(report.dropped, 1);
        assert!(!manager.contains(&handle.id));
    }

    #[tokio::test]
    async fn test_unsubscribe_removes_session() {
        let manager = manager(4, 16);
        let (handle, _rx) = manager.subscribe().unwrap();

        assert!(manager.unsubscribe(&handle.id));
        assert!(!manager.unsubscribe(&handle.id));
        assert_eq!(manager.session_count(), 0);
        assert_eq!(manager.broadcast("a").delivered, 0);
    }

    #[tokio::test]
    async fn test_session_cap_enforced() {
        let manager = manager(4, 1);
        let _first = manager.subscribe().unwrap();

        let err = manager.subscribe().expect_err("over cap");
        assert_eq!(
            err.kind,
            seathub_core::error::ErrorKind::ServiceUnavailable
        );
    }
}
