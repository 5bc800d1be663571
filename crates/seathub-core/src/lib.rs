//! # seathub-core
//!
//! Core crate for Seathub. Contains seam traits, configuration schemas,
//! typed identifiers, the pool event model, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Seathub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
