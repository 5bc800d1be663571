//! Reconnecting snapshot stream subscriber.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use seathub_telemetry::Snapshot;

/// Capped exponential backoff with a finite retry ceiling.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Delay before the first reconnect attempt.
    pub initial: Duration,
    /// Upper bound on any single delay.
    pub max: Duration,
    /// Attempts before giving up and surfacing a disconnect.
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(30),
            max_attempts: 10,
        }
    }
}

impl BackoffPolicy {
    /// Delay before attempt `attempt` (zero-based): `initial * 2^attempt`,
    /// capped at `max`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial.checked_mul(factor).unwrap_or(self.max).min(self.max)
    }
}

/// One update from the snapshot stream.
#[derive(Debug)]
pub enum StreamUpdate {
    /// A full-state snapshot. After any reconnect, the next snapshot is
    /// authoritative current state, never a delta.
    Snapshot(Snapshot),
    /// The retry ceiling was reached; the stream is over.
    Disconnected {
        /// Reconnect attempts made before giving up.
        attempts: u32,
    },
}

/// Snapshot stream subscriber.
///
/// Owns the connect/reconnect loop so callers only consume updates. The
/// attempt counter resets after every successful connection.
#[derive(Debug)]
pub struct SnapshotStream;

impl SnapshotStream {
    /// Connect to `ws_url` (e.g. `ws://localhost:8000/licenses/stream`)
    /// and stream updates until the consumer is dropped or the retry
    /// ceiling is reached.
    pub fn connect(ws_url: impl Into<String>, policy: BackoffPolicy) -> mpsc::Receiver<StreamUpdate> {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(run_stream(ws_url.into(), policy, tx));
        rx
    }
}

async fn run_stream(ws_url: String, policy: BackoffPolicy, tx: mpsc::Sender<StreamUpdate>) {
    let mut attempts: u32 = 0;

    loop {
        match connect_async(ws_url.as_str()).await {
            Ok((socket, _)) => {
                debug!(url = %ws_url, "Snapshot stream connected");
                attempts = 0;

                let (_, mut read) = socket.split();
                while let Some(frame) = read.next().await {
                    match frame {
                        Ok(Message::Text(text)) => match serde_json::from_str::<Snapshot>(text.as_str()) {
                            Ok(snapshot) => {
                                if tx.send(StreamUpdate::Snapshot(snapshot)).await.is_err() {
                                    return;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "Ignoring unparseable snapshot frame");
                            }
                        },
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            warn!(error = %e, "Snapshot stream read error");
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(url = %ws_url, error = %e, "Snapshot stream connect failed");
            }
        }

        if tx.is_closed() {
            return;
        }

        if attempts >= policy.max_attempts {
            let _ = tx.send(StreamUpdate::Disconnected { attempts }).await;
            return;
        }

        let delay = policy.delay_for(attempts);
        attempts += 1;
        debug!(attempt = attempts, delay_ms = delay.as_millis() as u64, "Reconnecting");
        tokio::time::sleep(delay).await;
    }
}
