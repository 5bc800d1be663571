//! Health, version, and metrics handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{HealthResponse, StreamMetricsResponse, VersionResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pools: state.ledger.pool_count(),
        sessions: state.realtime.sessions.session_count(),
    })
}

/// GET /version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Json<StreamMetricsResponse> {
    Json(StreamMetricsResponse {
        stream: state.realtime.metrics.snapshot(),
        buffered_events: state.buffer.total_events(),
    })
}
