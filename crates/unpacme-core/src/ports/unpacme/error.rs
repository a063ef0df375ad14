//! Error types for UnpacMe port operations.

use thiserror::Error;

use crate::domain::MalformedHash;

/// Errors from UnpacMe port operations.
///
/// These are domain-level errors that services and the CLI can handle.
/// Implementation-specific errors (HTTP, JSON) are mapped to these by the
/// adapter.
#[derive(Debug, Error)]
pub enum UnpacMePortError {
    /// A hash failed local validation and was never sent.
    #[error(transparent)]
    MalformedHash(#[from] MalformedHash),

    /// The request failed without a recognised error body: network failure,
    /// unexpected status, or a body that could not be decoded.
    #[error("Transport failure{}: {message}", status_suffix(.status))]
    Transport {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// What went wrong
        message: String,
    },

    /// The service rejected the request with a machine-readable error.
    #[error("Service error '{error}': {description}")]
    Domain {
        /// Machine-readable error code
        error: String,
        /// Human-readable explanation
        description: String,
    },

    /// The requested resource does not exist (unknown hash, no more history).
    #[error("Not found: {description}")]
    NotFound {
        /// Server-provided explanation, if any
        description: String,
    },
}

impl UnpacMePortError {
    /// Shorthand for a transport failure without a status code.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The domain error code, if this is a recognised service error.
    #[must_use]
    pub fn domain_code(&self) -> Option<&str> {
        match self {
            Self::Domain { error, .. } => Some(error),
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result type alias for UnpacMe port operations.
pub type UnpacMePortResult<T> = Result<T, UnpacMePortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UnpacMePortError::Domain {
            error: "quota_exceeded".to_string(),
            description: "Monthly limit reached".to_string(),
        };
        assert!(err.to_string().contains("quota_exceeded"));
        assert_eq!(err.domain_code(), Some("quota_exceeded"));

        let err = UnpacMePortError::Transport {
            status: Some(502),
            message: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("HTTP 502"));

        let err = UnpacMePortError::transport("connection reset");
        assert!(!err.to_string().contains("HTTP"));
        assert_eq!(err.domain_code(), None);
    }

    #[test]
    fn test_not_found_is_distinguishable() {
        let err = UnpacMePortError::NotFound {
            description: "Hash not found".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!UnpacMePortError::transport("x").is_not_found());
    }
}
