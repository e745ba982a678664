//! Error types for the teammate API client

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for teammate API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API-related errors
///
/// Every variant maps back to the HTTP status it was built from via
/// [`ApiError::status_code`]; transport and parse failures report 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Check the API key.")]
    Unauthorized,

    #[error("Access denied. The API key lacks permission for this operation.")]
    Forbidden,

    #[error("Teammate not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error (status {status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Unexpected status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// The HTTP status this error was built from.
    ///
    /// Transport failures and undecodable bodies have no server status and
    /// report `500 Internal Server Error`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServerError { status, .. } | ApiError::UnexpectedStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Network(_) | ApiError::InvalidResponse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True when the server signaled throttling.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimit(_))
    }

    /// The server-provided backoff hint, when there is one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::RateLimit(retry_after) => Some(*retry_after),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
