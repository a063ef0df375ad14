//! Error types for UnpacMe API operations.
//!
//! These errors are internal to the HTTP layer and are mapped to
//! `UnpacMePortError` at the port boundary.

use thiserror::Error;
use unpacme_core::ResultShapeError;

/// Result type alias for UnpacMe API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors related to UnpacMe API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response without a recognised error body.
    #[error("UnpacMe API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// 4xx response carrying a `{error, description}` body.
    #[error("UnpacMe API error '{error}': {description}")]
    Domain {
        /// Machine-readable error code
        error: String,
        /// Human-readable explanation
        description: String,
    },

    /// The requested resource does not exist.
    #[error("Not found: {description}")]
    NotFound {
        /// Server explanation, or the URL when the body had none
        description: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from UnpacMe API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ApiError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

impl From<ResultShapeError> for ApiError {
    fn from(err: ResultShapeError) -> Self {
        Self::invalid(err.to_string())
    }
}
