//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Connection defaults
pub const DEFAULT_API_BASE_URL: &str = "https://api.framer.com";
pub const SESSION_HEADER: &str = "X-Framer-Session";
pub const USER_AGENT: &str = concat!("framesync/", env!("CARGO_PKG_VERSION"));

// HTTP transport
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_HTTP_BASE_BACKOFF_MS: u64 = 200;

// Post-write identity resolution (linear backoff: step * (attempt - 1))
pub const DEFAULT_RESOLUTION_ATTEMPTS: u32 = 4;
pub const DEFAULT_RESOLUTION_BACKOFF_MS: u64 = 350;

// Env var names
pub const ENV_PROJECT_URL: &str = "FRAMESYNC_PROJECT_URL";
pub const ENV_API_KEY: &str = "FRAMESYNC_API_KEY";
pub const ENV_API_BASE_URL: &str = "FRAMESYNC_API_BASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "FRAMESYNC_HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_MAX_ATTEMPTS: &str = "FRAMESYNC_HTTP_MAX_ATTEMPTS";
pub const ENV_RESOLUTION_ATTEMPTS: &str = "FRAMESYNC_RESOLUTION_ATTEMPTS";
pub const ENV_RESOLUTION_BACKOFF_MS: &str = "FRAMESYNC_RESOLUTION_BACKOFF_MS";
pub const ENV_CHANGED_FIELDS_ONLY: &str = "FRAMESYNC_CHANGED_FIELDS_ONLY";
