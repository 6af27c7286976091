//! Error types for the request pipeline.
//!
//! The taxonomy mirrors what callers need to react to:
//! - transport failures (`Http`, `Timeout`) carry no structured payload,
//! - server-reported failures (`Api`) carry the decoded error envelope,
//! - `AuthExpired` marks an authentication failure (HTTP 401) after the
//!   pipeline has already cleared the stored credential.

use thiserror::Error;

/// Errors surfaced by the request pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Transport-level failure (connect, send, or body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Server-reported structured failure.
    #[error("API error {status} (code {code}): {message}")]
    Api {
        /// HTTP status of the failed response.
        status: u16,
        /// Application-level error code from the envelope.
        code: i64,
        /// Human-readable message from the envelope.
        message: String,
        /// Optional detail lines, in envelope order.
        details: Vec<String>,
    },

    /// Authentication failure. The stored token has been cleared and the
    /// auth-expired hook (if any) has already fired.
    #[error("Authentication expired")]
    AuthExpired,

    /// Invalid pipeline or request configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payload (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Create an `Api` error without detail lines.
    pub fn api_error(status: u16, code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Whether this error is the authentication-expiry signal.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::AuthExpired => Some(401),
            _ => None,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_helper_has_no_details() {
        let err = PipelineError::api_error(500, 1001, "boom");
        match err {
            PipelineError::Api {
                status,
                code,
                details,
                ..
            } => {
                assert_eq!(status, 500);
                assert_eq!(code, 1001);
                assert!(details.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn status_accessor_covers_auth_expiry() {
        assert_eq!(PipelineError::AuthExpired.status(), Some(401));
        assert!(PipelineError::AuthExpired.is_auth_expired());
        assert_eq!(PipelineError::Http("down".into()).status(), None);
    }
}
