use std::time::Duration;

use clap::ValueEnum;
use framesync_domain::FramesyncError;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "framesync=info";

/// Output format of the stderr log stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so stdout stays reserved for operation results.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
        LogFormat::Json => {
            registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()
        }
    }
}

/// Log the outcome of an operation with structured fields.
///
/// # Parameters
/// * `command` - Operation name (e.g. `"upsertCollectionItems"`).
/// * `elapsed` - Duration the operation took, session setup included.
/// * `error_type` - [`error_label`] of the failure, `None` on success.
///
/// Callers must avoid forwarding item data or credentials in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error_type: Option<&'static str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error_type {
        None => info!(command, duration_ms, success = true, "command_execution_success"),
        Some(error_type) => {
            warn!(command, duration_ms, success = false, error_type, "command_execution_failure");
        }
    }
}

/// Convert a `FramesyncError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &FramesyncError) -> &'static str {
    error.kind()
}
