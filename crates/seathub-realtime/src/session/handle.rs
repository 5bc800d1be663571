//! Individual streaming session handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use seathub_core::types::id::SessionId;

/// Result of pushing one payload into a session's outbound queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Queued for delivery.
    Sent,
    /// The outbound queue is full; the session cannot keep up.
    Full,
    /// The receiver is gone.
    Closed,
}

/// A handle to a single streaming session.
///
/// Holds the bounded sender for pushing serialized snapshots to the
/// session's delivery loop. The queue decouples the publisher from slow
/// consumers: a push never blocks.
#[derive(Debug)]
pub struct SessionHandle {
    /// Unique session ID.
    pub id: SessionId,
    /// When the session was registered.
    pub connected_at: DateTime<Utc>,
    /// Sender for serialized snapshots.
    sender: mpsc::Sender<String>,
    /// Whether the session is still in the fan-out set.
    alive: AtomicBool,
}

impl SessionHandle {
    /// Create a new handle wrapping the given sender.
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self {
            id: SessionId::new(),
            connected_at: Utc::now(),
            sender,
            alive: AtomicBool::new(true),
        }
    }

    /// Push one serialized snapshot without blocking.
    pub fn push(&self, payload: String) -> SendOutcome {
        if !self.is_alive() {
            return SendOutcome::Closed;
        }
        match self.sender.try_send(payload) {
            Ok(()) => SendOutcome::Sent,
            Err(mpsc::error::TrySendError::Full(_)) => SendOutcome::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                SendOutcome::Closed
            }
        }
    }

    /// Check if the session is still live.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the session as closed.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_delivers_in_order() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = SessionHandle::new(tx);

        assert_eq!(handle.push("one".to_string()), SendOutcome::Sent);
        assert_eq!(handle.push("two".to_string()), SendOutcome::Sent);

        assert_eq!(rx.recv().await.as_deref(), Some("one"));
        assert_eq!(rx.recv().await.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_full_queue_reported() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = SessionHandle::new(tx);

        assert_eq!(handle.push("one".to_string()), SendOutcome::Sent);
        assert_eq!(handle.push("two".to_string()), SendOutcome::Full);
    }

    #[tokio::test]
    async fn test_dropped_receiver_closes_handle() {
        let (tx, rx) = mpsc::channel(1);
        let handle = SessionHandle::new(tx);
        drop(rx);

        assert_eq!(handle.push("one".to_string()), SendOutcome::Closed);
        assert!(!handle.is_alive());
    }
}
