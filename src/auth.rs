//! Credential storage and bearer-auth header injection.
//!
//! The pipeline reads the token through the [`TokenStore`] seam; the token
//! lifecycle (set at login, cleared at logout) is owned by the embedding
//! application. The pipeline itself only clears the token on auth expiry.

use std::sync::RwLock;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::error::PipelineError;

/// Process-wide credential store collaborator.
pub trait TokenStore: Send + Sync {
    /// Current bearer token, if one is set.
    fn get_token(&self) -> Option<SecretString>;
    /// Replace the stored token.
    fn set_token(&self, token: SecretString);
    /// Drop the stored token.
    fn clear_token(&self);
}

/// In-memory token store.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_token(&self, token: SecretString) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token);
    }

    fn clear_token(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

/// Whether a request path targets an unauthenticated endpoint.
///
/// Matching is by exact path suffix against the configured allow-list.
pub(crate) fn is_public_path(path: &str, public_paths: &[String]) -> bool {
    public_paths.iter().any(|suffix| path.ends_with(suffix.as_str()))
}

/// Build the `Authorization: Bearer <token>` header value.
pub(crate) fn bearer_value(token: &SecretString) -> Result<HeaderValue, PipelineError> {
    let value = format!("Bearer {}", token.expose_secret());
    HeaderValue::from_str(&value)
        .map_err(|e| PipelineError::Configuration(format!("invalid bearer token: {e}")))
}
