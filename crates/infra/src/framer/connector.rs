//! Session factory for the HTTP adapter

use std::sync::Arc;

use async_trait::async_trait;
use framesync_core::session::{FramerSession, ProjectTarget, SessionConnector};
use framesync_domain::constants::USER_AGENT;
use framesync_domain::{Config, FramesyncError, Result};
use reqwest::Method;
use tracing::{info, instrument};
use url::Url;

use super::api::FramerApi;
use super::session::HttpFramerSession;
use super::wire::{OpenSessionRequest, OpenSessionResponse};
use crate::http::HttpClient;

/// Opens Framer sessions over HTTP
#[derive(Clone)]
pub struct HttpSessionConnector {
    http: HttpClient,
    base_url: Url,
}

impl HttpSessionConnector {
    pub fn new(http: HttpClient, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Build the HTTP client and endpoint from configuration.
    ///
    /// # Errors
    /// `FramesyncError::Config` for an invalid base URL; transport errors if
    /// the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = FramerApi::parse_base_url(&config.connection.api_base_url)?;
        let http = HttpClient::builder()
            .timeout(config.http.timeout())
            .max_attempts(config.http.max_attempts)
            .base_backoff(config.http.base_backoff())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::new(http, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl SessionConnector for HttpSessionConnector {
    #[instrument(skip(self, target), fields(project_url = %target.project_url))]
    async fn connect(&self, target: &ProjectTarget) -> Result<Arc<dyn FramerSession>> {
        let api = FramerApi::new(self.http.clone(), self.base_url.clone(), target.api_key.clone());
        let response = api
            .send(
                Method::POST,
                &["v1", "sessions"],
                &[],
                Some(&OpenSessionRequest { project_url: &target.project_url }),
                None,
            )
            .await?;
        let opened: OpenSessionResponse = FramerApi::read(response).await?;
        let session_id = opened.session_id.trim();
        if session_id.is_empty() {
            return Err(FramesyncError::Transport("session open returned no session id".into()));
        }

        info!(session_id, "Framer session opened");
        Ok(Arc::new(HttpFramerSession::new(api, session_id)))
    }
}
