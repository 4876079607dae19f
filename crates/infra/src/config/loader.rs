//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `FRAMESYNC_PROJECT_URL`: Framer project URL (required)
//! - `FRAMESYNC_API_KEY`: Framer API key (required)
//! - `FRAMESYNC_API_BASE_URL`: API endpoint override
//! - `FRAMESYNC_HTTP_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `FRAMESYNC_HTTP_MAX_ATTEMPTS`: Attempts for idempotent requests
//! - `FRAMESYNC_RESOLUTION_ATTEMPTS`: Post-write resolution attempts
//! - `FRAMESYNC_RESOLUTION_BACKOFF_MS`: Linear backoff step in milliseconds
//! - `FRAMESYNC_CHANGED_FIELDS_ONLY`: Default sync mode (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./framesync.json` or `./framesync.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use framesync_domain::constants::{
    DEFAULT_API_BASE_URL, ENV_API_BASE_URL, ENV_API_KEY, ENV_CHANGED_FIELDS_ONLY,
    ENV_HTTP_MAX_ATTEMPTS, ENV_HTTP_TIMEOUT_SECS, ENV_PROJECT_URL, ENV_RESOLUTION_ATTEMPTS,
    ENV_RESOLUTION_BACKOFF_MS,
};
use framesync_domain::{
    Config, ConnectionConfig, FramesyncError, HttpConfig, ReconcileConfig, Result,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `FramesyncError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The project URL and API key must be present; every other setting falls
/// back to its default when unset.
///
/// # Errors
/// Returns `FramesyncError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let project_url = env_var(ENV_PROJECT_URL)?;
    let api_key = env_var(ENV_API_KEY)?;
    let api_base_url =
        std::env::var(ENV_API_BASE_URL).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

    let http_defaults = HttpConfig::default();
    let reconcile_defaults = ReconcileConfig::default();

    Ok(Config {
        connection: ConnectionConfig { project_url, api_key, api_base_url },
        http: HttpConfig {
            timeout_seconds: env_parse(ENV_HTTP_TIMEOUT_SECS, http_defaults.timeout_seconds)?,
            max_attempts: env_parse(ENV_HTTP_MAX_ATTEMPTS, http_defaults.max_attempts)?,
            ..http_defaults
        },
        reconcile: ReconcileConfig {
            resolution_attempts: env_parse(
                ENV_RESOLUTION_ATTEMPTS,
                reconcile_defaults.resolution_attempts,
            )?,
            resolution_backoff_ms: env_parse(
                ENV_RESOLUTION_BACKOFF_MS,
                reconcile_defaults.resolution_backoff_ms,
            )?,
            changed_fields_only: env_bool(
                ENV_CHANGED_FIELDS_ONLY,
                reconcile_defaults.changed_fields_only,
            ),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `FramesyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FramesyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FramesyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FramesyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FramesyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FramesyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(FramesyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("framesync.json"),
        dir.join("framesync.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `FramesyncError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        FramesyncError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional numeric environment variable, `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| FramesyncError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
