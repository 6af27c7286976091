//! Pipeline and per-request configuration types.

use std::collections::HashMap;
use std::time::Duration;

use crate::defaults;

/// Configuration for a [`RequestPipeline`](crate::pipeline::RequestPipeline).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Prefix prepended to relative request paths.
    pub base_url: String,
    /// Request timeout. Defaults to 10 seconds when unset.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Headers attached to every request.
    pub headers: HashMap<String, String>,
    /// User agent.
    pub user_agent: Option<String>,
    /// Path suffixes that never receive an `Authorization` header
    /// (login/register style endpoints).
    pub public_paths: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Some(defaults::REQUEST_TIMEOUT),
            connect_timeout: None,
            headers: HashMap::new(),
            user_agent: None,
            public_paths: defaults::PUBLIC_PATHS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Effective request timeout, falling back to the crate default.
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(defaults::REQUEST_TIMEOUT)
    }
}

/// Per-call request options.
///
/// Extends the pipeline defaults with the one pipeline-specific flag:
/// `show_error_message` suppresses the failure notification for a single
/// call. It never suppresses auth-expiry handling.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// When `false`, a structured server failure does not raise a
    /// user-facing notification. Defaults to `true`.
    pub show_error_message: bool,
    /// Per-call timeout override.
    pub timeout: Option<Duration>,
    /// Extra headers for this call only.
    pub headers: HashMap<String, String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            show_error_message: true,
            timeout: None,
            headers: HashMap::new(),
        }
    }
}

impl RequestConfig {
    /// Create the default per-call configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-call configuration with notifications suppressed.
    pub fn silent() -> Self {
        Self {
            show_error_message: false,
            ..Self::default()
        }
    }

    pub fn show_error_message(mut self, show: bool) -> Self {
        self.show_error_message = show;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}
