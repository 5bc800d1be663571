//! Top-level streaming engine facade.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use seathub_core::config::realtime::RealtimeConfig;

use crate::metrics::StreamMetrics;
use crate::session::manager::SessionManager;

/// Central facade tying together the session registry, stream metrics,
/// and the shutdown signal shared with the publisher task.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Session registry and fan-out.
    pub sessions: Arc<SessionManager>,
    /// Stream metrics.
    pub metrics: Arc<StreamMetrics>,
    /// Shutdown signal sender.
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("sessions", &self.sessions.session_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Create a new engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        info!("Realtime engine initialized");

        Self {
            sessions: Arc::new(SessionManager::new(config)),
            metrics: Arc::new(StreamMetrics::new()),
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    /// Returns a shutdown receiver for the publisher task.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown: stops the publisher and closes all
    /// sessions.
    pub fn shutdown(&self) {
        info!("Shutting down realtime engine");
        let _ = self.shutdown_tx.send(true);
        self.sessions.close_all();
    }
}
