//! # seathub-client
//!
//! Client library for the Seathub license pool server.
//!
//! - Async REST operations with RAII borrow handles
//! - A snapshot stream subscriber with capped-exponential reconnect backoff
//!
//! # Example
//!
//! ```no_run
//! use seathub_client::{LicenseClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = LicenseClient::new("http://localhost:8000");
//!
//!     let license = client.borrow("cad_tool", "rust-user").await?;
//!     println!("Got license: {}", license.id());
//!     license.return_license().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod rest;
pub mod stream;

pub use rest::{LicenseClient, LicenseHandle};
pub use stream::{BackoffPolicy, SnapshotStream, StreamUpdate};

use thiserror::Error;

/// Custom error type for license operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP request itself failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The pool has no seats available.
    #[error("No licenses available for tool: {0}")]
    NoLicensesAvailable(String),

    /// The server answered with a non-success status.
    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    /// The server's response could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
