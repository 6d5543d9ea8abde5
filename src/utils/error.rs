//! Error types and handling
//!
//! Every failure of a backend interaction is reported as an [`ApiError`].
//! The `Display` output of each variant is the text shown to the user, so a
//! server-provided `{"error": "..."}` message is surfaced verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a failed response carries no usable `error` field
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// Client error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout, TLS)
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Server `error` field, or [`FALLBACK_ERROR_MESSAGE`]
        message: String,
    },

    /// A successful response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Client-side validation rejected the input before any request
    #[error("{0}")]
    Validation(String),

    /// Persisted token storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// The owning screen went away while the request was in flight
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Build an HTTP error from a status code and the raw error body.
    ///
    /// The body is expected to look like `{"error": "..."}`; anything else
    /// (empty, not JSON, missing or non-string field) falls back to
    /// [`FALLBACK_ERROR_MESSAGE`].
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

        ApiError::Http { status, message }
    }

    /// HTTP status of the failure, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the request as unauthenticated
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Message to show the user, with `fallback` for failures that carry no text
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

/// Error body convention of the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    #[serde(default)]
    pub error: Option<String>,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request to the HRMS backend timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to the HRMS backend".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(first_validation_message(&err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

/// Pick the first field message out of a validator error set.
///
/// Field errors are visited in field-name order so the result is stable.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| (field, e)))
        .map(|(field, e)| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {}", field))
        })
        .next()
        .unwrap_or_else(|| errors.to_string())
}

/// Result type alias for client operations
pub type ApiResult<T> = Result<T, ApiError>;
