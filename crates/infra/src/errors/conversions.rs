//! Conversions from external infrastructure errors into domain errors.

use framesync_domain::FramesyncError;
use reqwest::{Error as HttpError, StatusCode};
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FramesyncError);

impl From<InfraError> for FramesyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FramesyncError> for InfraError {
    fn from(value: FramesyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFramesyncError {
    fn into_framesync(self) -> FramesyncError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FramesyncError */
/* -------------------------------------------------------------------------- */

impl IntoFramesyncError for HttpError {
    fn into_framesync(self) -> FramesyncError {
        if self.is_timeout() {
            return FramesyncError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return FramesyncError::Transport("HTTP connection failure".into());
        }

        if self.is_decode() {
            return FramesyncError::Transport(format!("failed to decode HTTP response: {self}"));
        }

        if self.is_builder() {
            return FramesyncError::Internal(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let message =
                format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status"));
            return status_error(status, message);
        }

        FramesyncError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_framesync())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → FramesyncError */
/* -------------------------------------------------------------------------- */

impl IntoFramesyncError for JsonError {
    fn into_framesync(self) -> FramesyncError {
        if self.is_data() || self.is_syntax() || self.is_eof() {
            FramesyncError::Transport(format!("unexpected response payload: {self}"))
        } else {
            FramesyncError::Internal(format!("JSON serialization failed: {self}"))
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_framesync())
    }
}

/// Map a non-success HTTP status to the domain taxonomy.
pub(crate) fn status_error(status: StatusCode, message: String) -> FramesyncError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FramesyncError::Auth(message),
        StatusCode::NOT_FOUND => FramesyncError::NotFound(message),
        _ => FramesyncError::Transport(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
