//! WebSocket snapshot stream handler.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use seathub_realtime::session::handle::SessionHandle;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /licenses/stream — WebSocket upgrade
///
/// The session is registered before the upgrade so the session cap is
/// enforced on the handshake.
pub async fn stream_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let (handle, rx) = state.realtime.sessions.subscribe()?;
    state.realtime.metrics.session_opened();

    Ok(ws.on_upgrade(move |socket| run_session(state, handle, rx, socket)))
}

/// Drives one established stream session.
async fn run_session(
    state: AppState,
    handle: Arc<SessionHandle>,
    mut rx: mpsc::Receiver<String>,
    socket: WebSocket,
) {
    let session_id = handle.id;
    let (mut ws_tx, mut ws_rx) = socket.split();

    info!(session_id = %session_id, "Stream session established");

    // Send a full current snapshot immediately: a reconnecting client must
    // be able to treat its first frame as authoritative state rather than
    // waiting for the next tick.
    match serde_json::to_string(&state.composer.compose().await) {
        Ok(payload) => {
            if ws_tx.send(Message::Text(payload.into())).await.is_err() {
                state.realtime.sessions.unsubscribe(&session_id);
                return;
            }
        }
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Failed to serialize initial snapshot");
        }
    }

    // Forward broadcast snapshots to the socket.
    let forward = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_tx.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // Drain the read side to observe disconnects; inbound frames carry no
    // protocol of their own.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Stream session error");
                break;
            }
        }
    }

    forward.abort();
    state.realtime.sessions.unsubscribe(&session_id);

    info!(session_id = %session_id, "Stream session closed");
}
