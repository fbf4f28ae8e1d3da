//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is returned by the REST handlers and renders as a
//! structured JSON body. [`DeliveryError`] covers a failed write to one
//! client connection; it never reaches HTTP and only triggers pruning.
//! [`ConfigError`] is fatal at startup.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "missing required query parameter: website"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Range     | Category   | HTTP Status     |
/// |-----------|------------|-----------------|
/// | 1000–1999 | Validation | 400 Bad Request |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A required query parameter was absent or empty.
    #[error("missing required query parameter: {0}")]
    MissingParameter(&'static str),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MissingParameter(_) => 1001,
            Self::InvalidRequest(_) => 1002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Failure to write one envelope to one client connection.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The transport rejected the write (reset, broken pipe, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer did not accept the frame in time.
    #[error("write timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<axum::Error> for DeliveryError {
    fn from(err: axum::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Invalid startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was set to a value that does not parse.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value found.
        value: String,
    },
}
