//! # seathub-api
//!
//! HTTP surface for the license pool engine: REST endpoints for
//! borrow/return/status and budget administration, plus the WebSocket
//! stream that pushes one snapshot per publisher tick.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
