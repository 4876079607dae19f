//! # Framesync Domain
//!
//! Data model for reconciling Framer CMS collections.
//!
//! This crate contains:
//! - Item, change-set and sync-record value types
//! - Field, enum-case and project/deployment types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Framesync crates
//! - Only external dependencies allowed
//! - Pure value records: created per request, never persisted

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
