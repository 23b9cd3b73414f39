//! Error types for Looker API operations.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during Looker API operations.
#[derive(Debug, Error)]
pub enum LookerError {
    /// Client configuration is missing or malformed.
    #[error("invalid Looker configuration: {0}")]
    InvalidConfig(String),

    /// The credential exchange was rejected or returned an unusable token.
    #[error("Looker authentication failed: {message}")]
    Auth {
        message: String,
        status_code: Option<u16>,
    },

    /// Fetching the session descriptor failed.
    #[error("unable to fetch Looker session: {0}")]
    Session(#[source] Box<LookerError>),

    /// The session reported a workspace other than `production` or `dev`.
    #[error("session workspace '{0}' is neither 'production' nor 'dev'")]
    UnknownWorkspace(String),

    /// Establishing the dev-workspace connection failed.
    #[error("unable to create dev connection: {0}")]
    DevSession(#[source] Box<LookerError>),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Looker API error {status_code} on {path}: {message}")]
    Api {
        status_code: u16,
        message: String,
        path: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server's pagination links are unusable.
    #[error("pagination error: {0}")]
    Pagination(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The API rejected the request payload.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// The operation is not backed by an endpoint for this resource.
    #[error("{operation} is not implemented for {entity_type}")]
    Unimplemented {
        entity_type: &'static str,
        operation: &'static str,
    },

    /// The caller cancelled the request or its deadline passed.
    #[error("request cancelled")]
    Cancelled,

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// A single field-level error from a Looker validation response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LookerError {
    /// Returns true for a missing entity, which callers deleting or probing
    /// for existence usually treat as a normal outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
            || matches!(self, Self::Api { status_code: 404, .. })
    }

    /// Returns true for errors that leave the whole client unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::UnknownWorkspace(_))
    }

    /// Returns true if repeating the same call may succeed.
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status_code, .. } => *status_code == 429 || *status_code >= 500,
            _ => false,
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            Self::Auth { status_code, .. } => *status_code,
            Self::NotFound { .. } => Some(404),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Session(inner) | Self::DevSession(inner) => inner.status_code(),
            _ => None,
        }
    }
}

/// Result type alias for Looker operations.
pub type Result<T> = core::result::Result<T, LookerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = LookerError::NotFound {
            entity_type: "ModelSet",
            id: "7".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.to_string(), "ModelSet '7' not found");
    }

    #[test]
    fn test_retryable_statuses() {
        let api = |status_code| LookerError::Api {
            status_code,
            message: String::new(),
            path: "4.0/users".to_string(),
        };
        assert!(api(503).is_retryable());
        assert!(api(429).is_retryable());
        assert!(!api(400).is_retryable());
        assert!(!LookerError::Cancelled.is_retryable());
    }

    #[test]
    fn test_fatal_errors() {
        assert!(LookerError::UnknownWorkspace("staging".to_string()).is_fatal());
        assert!(LookerError::Auth {
            message: "bad".to_string(),
            status_code: Some(403)
        }
        .is_fatal());
        assert!(!LookerError::Pagination("loop".to_string()).is_fatal());
    }

    #[test]
    fn test_wrapped_status_code() {
        let err = LookerError::DevSession(Box::new(LookerError::Api {
            status_code: 500,
            message: "boom".to_string(),
            path: "4.0/session".to_string(),
        }));
        assert_eq!(err.status_code(), Some(500));
        assert!(err.to_string().contains("dev connection"));
    }
}
