//! # Framesync Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client with retry for idempotent requests
//! - Configuration loading from environment and files
//! - The Framer API adapter implementing the session ports
//!
//! ## Architecture
//! - Implements traits defined in `framesync-core`
//! - Contains all "impure" code (network and filesystem I/O)
//! - Converts transport failures into `FramesyncError` at the boundary

pub mod config;
pub mod errors;
pub mod framer;
pub mod http;

// Re-export commonly used items
pub use errors::InfraError;
pub use framer::{FramerApi, HttpFramerSession, HttpSessionConnector};
pub use http::{HttpClient, HttpClientBuilder};
