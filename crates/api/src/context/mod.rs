//! Application context - dependency injection container

use std::sync::Arc;

use framesync_common::time::{Sleeper, TokioSleeper};
use framesync_core::{ProjectTarget, ResolutionPolicy, SessionConnector};
use framesync_domain::{Config, Result, SyncMode};
use framesync_infra::config::load;
use framesync_infra::HttpSessionConnector;
use tracing::info;

/// Type alias for session connector port trait object
type DynSessionConnector = dyn SessionConnector;

/// Type alias for sleeper trait object
type DynSleeper = dyn Sleeper;

/// Application context - holds configuration and the adapters operations run on
pub struct AppContext {
    pub config: Config,
    pub connector: Arc<DynSessionConnector>,
    pub sleeper: Arc<DynSleeper>,
    pub policy: ResolutionPolicy,
}

impl AppContext {
    /// Load configuration (environment first, then file) and wire the HTTP
    /// adapters.
    pub fn new() -> Result<Self> {
        let config = load()?;
        Self::new_with_config(config)
    }

    /// Wire the HTTP adapters for an already loaded configuration.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let connector = HttpSessionConnector::from_config(&config)?;
        info!(api_base_url = %connector.base_url(), "framer connector ready");
        Ok(Self::with_connector(config, Arc::new(connector)))
    }

    /// Use a caller-supplied connector, e.g. an in-memory one in tests.
    pub fn with_connector(config: Config, connector: Arc<DynSessionConnector>) -> Self {
        let policy = ResolutionPolicy::from(&config.reconcile);
        Self { config, connector, sleeper: Arc::new(TokioSleeper), policy }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<DynSleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Connection target for one operation.
    ///
    /// A `custom_url` replaces the configured project URL, even when blank,
    /// so an empty override is reported instead of silently ignored.
    pub fn target(&self, custom_url: Option<&str>) -> Result<ProjectTarget> {
        let project_url = custom_url.unwrap_or(&self.config.connection.project_url);
        ProjectTarget::new(project_url, &self.config.connection.api_key)
    }

    /// Sync mode used when a request does not choose one.
    pub fn default_mode(&self) -> SyncMode {
        SyncMode::from_changed_fields_only(self.config.reconcile.changed_fields_only)
    }
}
