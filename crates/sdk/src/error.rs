//! Error types for the Proscout SDK.

use proscout_core::{FailureKind, QueryError};
use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type ProscoutResult<T> = Result<T, ProscoutError>;

/// Error types that can occur when using the Proscout SDK.
#[derive(Debug, thiserror::Error)]
pub enum ProscoutError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Connection timeout.
    #[error("Request timed out")]
    Timeout,

    /// Credentials rejected by the service.
    #[error("Authentication failed (status {status}): {message}")]
    Authentication { status: u16, message: String },

    /// The streamed search was rejected by the server; the message is verbatim.
    #[error("{message}")]
    StreamRejected { message: String },

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid query.
    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ProscoutError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Classify the error for diagnostics and caller decisions.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Authentication { .. } => FailureKind::Authentication,
            Self::Http(e) if e.is_decode() => FailureKind::Protocol,
            Self::Http(_) | Self::WebSocket(_) | Self::Timeout | Self::RateLimited { .. } => {
                FailureKind::Transport
            }
            Self::Api { status, .. } if *status >= 500 => FailureKind::Transport,
            Self::Api { .. } | Self::NotFound(_) | Self::StreamRejected { .. } => {
                FailureKind::Remote
            }
            Self::Json(_) => FailureKind::Protocol,
            Self::Config(_) | Self::InvalidInput(_) | Self::Query(_) | Self::InvalidUrl(_) => {
                FailureKind::Configuration
            }
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Authentication { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound(_) => Some(404),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the credentials were rejected.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Create an error from a non-success status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (message, details) = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error_response) => (error_response.error, error_response.details),
            Err(_) => (body.to_string(), None),
        };

        match status {
            401 | 403 => Self::Authentication { status, message },
            404 => Self::NotFound(message),
            429 => Self::RateLimited {
                retry_after_secs: None,
            },
            _ => Self::Api {
                status,
                message,
                details,
            },
        }
    }
}

/// Error response from the search service.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "message")]
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
