//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use seathub_api::{AppState, build_router};
use seathub_core::config::AppConfig;
use seathub_core::config::pool::PoolSeed;
use seathub_core::traits::EventSink;
use seathub_ledger::{MemoryBorrowStore, PoolLedger};
use seathub_realtime::RealtimeEngine;
use seathub_telemetry::{EventBuffer, SnapshotComposer};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The underlying application state, for direct subsystem access
    pub state: AppState,
}

impl TestApp {
    /// Create a test application with the given seed pools.
    pub fn new(seeds: &[PoolSeed]) -> Self {
        let mut config = AppConfig {
            pools: seeds.to_vec(),
            ..AppConfig::default()
        };
        // Generous session queues keep timing-sensitive streaming tests from
        // tripping the slow-consumer drop on a loaded machine.
        config.realtime.session_buffer_snapshots = 64;

        let buffer = Arc::new(EventBuffer::new(config.telemetry.clone()));
        let ledger = Arc::new(PoolLedger::with_seeds(
            &config.pools,
            Arc::new(MemoryBorrowStore::new()),
            Arc::clone(&buffer) as Arc<dyn EventSink>,
        ));
        let composer = Arc::new(SnapshotComposer::new(
            Arc::clone(&ledger),
            Arc::clone(&buffer),
            config.telemetry.clone(),
        ));
        let realtime = RealtimeEngine::new(config.realtime.clone());

        let state = AppState {
            config: Arc::new(config),
            ledger,
            buffer,
            composer,
            realtime,
        };

        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Convenience seed builder.
    pub fn seed(tool: &str, total: u32, commit: u32, max_overage: u32) -> PoolSeed {
        PoolSeed {
            tool: tool.to_string(),
            total,
            commit,
            max_overage,
            commit_price: 5000.0,
            overage_price_per_license: 500.0,
        }
    }

    /// Issue one request and return status plus parsed JSON body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);

        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    /// Borrow one seat over HTTP and return the issued borrow id.
    pub async fn borrow(&self, tool: &str, user: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/licenses/borrow",
                Some(serde_json::json!({ "tool": tool, "user": user })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "borrow failed: {body}");
        body["id"].as_str().expect("borrow id").to_string()
    }
}
