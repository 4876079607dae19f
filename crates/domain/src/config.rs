//! Configuration management

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_BASE_BACKOFF_MS, DEFAULT_HTTP_MAX_ATTEMPTS,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_RESOLUTION_ATTEMPTS, DEFAULT_RESOLUTION_BACKOFF_MS,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

/// Framer project credentials and endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub project_url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("project_url", &self.project_url)
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_HTTP_BASE_BACKOFF_MS,
        }
    }
}

/// Reconciliation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Total post-write resolution attempts, first one included.
    pub resolution_attempts: u32,
    /// Linear backoff step between resolution attempts.
    pub resolution_backoff_ms: u64,
    /// Default sync mode when a request does not choose one.
    pub changed_fields_only: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            resolution_attempts: DEFAULT_RESOLUTION_ATTEMPTS,
            resolution_backoff_ms: DEFAULT_RESOLUTION_BACKOFF_MS,
            changed_fields_only: true,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [connection]
            project_url = "https://framer.com/projects/Site--abc"
            api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.connection.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.http, HttpConfig::default());
        assert_eq!(config.reconcile.resolution_attempts, 4);
        assert_eq!(config.reconcile.resolution_backoff_ms, 350);
        assert!(config.reconcile.changed_fields_only);
    }

    #[test]
    fn api_key_is_redacted() {
        let connection = ConnectionConfig {
            project_url: "https://framer.com/projects/x".into(),
            api_key: "super-secret".into(),
            api_base_url: default_api_base_url(),
        };

        assert!(!format!("{connection:?}").contains("super-secret"));
        let json = serde_json::to_string(&connection).unwrap();
        assert!(!json.contains("super-secret"));
    }
}
