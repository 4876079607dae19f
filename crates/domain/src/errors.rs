//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Framesync
///
/// Unresolved items after a reconciliation are not errors; they are
/// reported on the individual sync records.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FramesyncError {
    /// Malformed caller input, rejected before any remote call.
    #[error("{0}")]
    Precondition(String),

    /// A referenced remote resource does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller cancelled before any result could be produced.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FramesyncError {
    /// Stable, low-cardinality label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "precondition",
            Self::NotFound(_) => "not_found",
            Self::Transport(_) => "transport",
            Self::Auth(_) => "auth",
            Self::Config(_) => "config",
            Self::Cancelled(_) => "cancelled",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Framesync operations
pub type Result<T> = std::result::Result<T, FramesyncError>;
