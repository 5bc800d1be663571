//! Seathub Server — License Seat Pool Engine
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use seathub_core::config::AppConfig;
use seathub_core::error::AppError;
use seathub_core::traits::EventSink;
use seathub_ledger::{MemoryBorrowStore, PoolLedger};
use seathub_realtime::{RealtimeEngine, spawn_publisher};
use seathub_telemetry::{EventBuffer, SnapshotComposer};

#[tokio::main]
async fn main() {
    let env = std::env::var("SEATHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Seathub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Telemetry buffer ─────────────────────────────────
    let buffer = Arc::new(EventBuffer::new(config.telemetry.clone()));

    // ── Step 2: Pool ledger from seed configuration ──────────────
    let store = Arc::new(MemoryBorrowStore::new());
    let ledger = Arc::new(PoolLedger::with_seeds(
        &config.pools,
        store,
        Arc::clone(&buffer) as Arc<dyn EventSink>,
    ));
    tracing::info!(pools = ledger.pool_count(), "Pool ledger initialized");

    // ── Step 3: Snapshot composer ────────────────────────────────
    let composer = Arc::new(SnapshotComposer::new(
        Arc::clone(&ledger),
        Arc::clone(&buffer),
        config.telemetry.clone(),
    ));

    // ── Step 4: Realtime engine + publisher task ─────────────────
    let realtime = RealtimeEngine::new(config.realtime.clone());
    let publisher = spawn_publisher(
        Arc::clone(&composer),
        Arc::clone(&realtime.sessions),
        Arc::clone(&realtime.metrics),
        config.realtime.clone(),
        realtime.shutdown_receiver(),
    );
    tracing::info!(
        interval_ms = config.realtime.snapshot_interval_ms,
        "Snapshot publisher started"
    );

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = seathub_api::AppState {
        config: Arc::new(config.clone()),
        ledger,
        buffer,
        composer,
        realtime: realtime.clone(),
    };

    let app = seathub_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Seathub server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    realtime.shutdown();
    let _ = tokio::time::timeout(Duration::from_secs(5), publisher).await;

    tracing::info!("Seathub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
