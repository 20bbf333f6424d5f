//! Error types for the lakeops client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the workspace API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request parameters, detected before any remote call
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Local I/O failed (cache writes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dispatched start task did not run to completion
    #[error("Start task failed: {0}")]
    TaskFailed(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a permission error
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::ApiError { status: 403, .. })
    }
}
