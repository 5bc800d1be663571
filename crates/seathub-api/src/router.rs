//! Route definitions for the Seathub HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(license_routes())
        .merge(config_routes())
        .merge(ops_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Borrow/return/status plus the snapshot stream.
fn license_routes() -> Router<AppState> {
    Router::new()
        .route("/licenses/borrow", post(handlers::licenses::borrow))
        .route("/licenses/return", post(handlers::licenses::return_license))
        .route("/licenses/status", get(handlers::licenses::status_all))
        .route("/licenses/{tool}/status", get(handlers::licenses::status))
        .route("/licenses/stream", get(handlers::stream::stream_upgrade))
        .route("/borrows", get(handlers::licenses::list_borrows))
        .route(
            "/overage-charges",
            get(handlers::licenses::list_overage_charges),
        )
}

/// Budget administration.
fn config_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/config/budget",
            get(handlers::config::get_budget).put(handlers::config::update_budget),
        )
        .route("/config/pools", post(handlers::config::provision_pool))
        .route(
            "/config/pools/{tool}",
            delete(handlers::config::deactivate_pool),
        )
}

/// Health, version, and metrics.
fn ops_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/version", get(handlers::health::version))
        .route("/metrics", get(handlers::health::metrics))
}
