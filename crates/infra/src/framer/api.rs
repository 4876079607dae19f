//! Authenticated access to the Framer JSON API
//!
//! Every request carries the bearer API key; session-scoped requests also
//! carry the session header. Non-success statuses are mapped onto the
//! domain error taxonomy here so callers only ever see `FramesyncError`.

use std::fmt;

use framesync_domain::constants::SESSION_HEADER;
use framesync_domain::{FramesyncError, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::conversions::status_error;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Placeholder for requests without a body
pub const NO_BODY: Option<&()> = None;

/// Request builder bound to one API endpoint and key
#[derive(Clone)]
pub struct FramerApi {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for FramerApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramerApi")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl FramerApi {
    pub fn new(http: HttpClient, base_url: Url, api_key: impl Into<String>) -> Self {
        Self { http, base_url, api_key: api_key.into() }
    }

    /// Parse and validate an API base URL.
    ///
    /// # Errors
    /// `FramesyncError::Config` when `raw` is not an absolute http(s) URL.
    pub fn parse_base_url(raw: &str) -> Result<Url> {
        let url = Url::parse(raw.trim())
            .map_err(|e| FramesyncError::Config(format!("Invalid API base URL '{raw}': {e}")))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(FramesyncError::Config(format!("Invalid API base URL '{raw}'")));
        }
        Ok(url)
    }

    /// Append percent-encoded path segments to the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FramesyncError::Config(format!("Invalid API base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and fail on any non-success status.
    #[instrument(skip(self, query, body, session_id), fields(method = %method, path = %segments.join("/")))]
    pub async fn send<B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
        session_id: Option<&str>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let mut request = self
            .http
            .request(method, url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key));
        if let Some(session_id) = session_id {
            request = request.header(SESSION_HEADER, session_id);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, url.as_str(), &text));
        }
        debug!(%status, "Framer API call succeeded");
        Ok(response)
    }

    /// Decode a JSON body that must be present.
    pub async fn read<R: DeserializeOwned>(response: Response) -> Result<R> {
        let url = response.url().to_string();
        Self::read_optional(response).await?.ok_or_else(|| {
            FramesyncError::Transport(format!("{url} returned an empty response body"))
        })
    }

    /// Decode a JSON body, `None` when the body is empty or `null`.
    pub async fn read_optional<R: DeserializeOwned>(response: Response) -> Result<Option<R>> {
        let text = response.text().await.map_err(InfraError::from)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_str(&text).map_err(InfraError::from)?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value).map_err(InfraError::from)?))
    }
}

fn map_status_error(status: StatusCode, url: &str, body: &str) -> FramesyncError {
    let message = if body.is_empty() {
        format!("{url} returned status {status}")
    } else {
        format!("{url} returned status {status}: {body}")
    };
    status_error(status, message)
}
