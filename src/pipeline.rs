//! The request pipeline: construction, interception stages, and verbs.
//!
//! A [`RequestPipeline`] wraps one `reqwest::Client` configured once at
//! construction (base URL, timeout, default headers). Every request passes
//! through the same two stages:
//!
//! - outgoing: in-flight tracking begins, the bearer token is attached unless
//!   the path is on the public allow-list, per-call options are merged;
//! - incoming: tracking ends, success envelopes are unwrapped, structured
//!   failures raise a notification (unless opted out), and HTTP 401 clears
//!   the token and fires the auth-expired hook.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::activity::ActivityTracker;
use crate::auth::{self, MemoryTokenStore, TokenStore};
use crate::config::{PipelineConfig, RequestConfig};
use crate::envelope::{self, ErrorEnvelope};
use crate::error::{PipelineError, Result};
use crate::hooks::{AuthExpiredHook, ErrorNote, Notifier};

/// HTTP client pipeline with auth injection, activity tracking, and error
/// surfacing.
#[derive(Clone)]
pub struct RequestPipeline {
    http_client: reqwest::Client,
    config: PipelineConfig,
    token_store: Arc<dyn TokenStore>,
    notifier: Option<Arc<dyn Notifier>>,
    auth_hook: Option<Arc<dyn AuthExpiredHook>>,
    activity: ActivityTracker,
}

impl RequestPipeline {
    /// Returns a builder for constructing a pipeline.
    pub fn builder() -> RequestPipelineBuilder {
        RequestPipelineBuilder::new()
    }

    /// The activity tracker for this pipeline instance.
    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    /// The credential store collaborator.
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.token_store
    }

    /// GET request. Resolves to the unwrapped `data` payload.
    pub async fn get<T, Q>(
        &self,
        path: &str,
        query: Option<&Q>,
        config: Option<RequestConfig>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut rb = self.http_client.get(self.resolve_url(path));
        if let Some(query) = query {
            rb = rb.query(query);
        }
        self.execute(Method::GET, path, rb, config).await
    }

    /// POST request with an optional JSON body.
    pub async fn post<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut rb = self.http_client.post(self.resolve_url(path));
        if let Some(body) = body {
            rb = rb.json(body);
        }
        self.execute(Method::POST, path, rb, config).await
    }

    /// PUT request with an optional JSON body.
    pub async fn put<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut rb = self.http_client.put(self.resolve_url(path));
        if let Some(body) = body {
            rb = rb.json(body);
        }
        self.execute(Method::PUT, path, rb, config).await
    }

    /// PATCH request with an optional JSON body.
    pub async fn patch<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut rb = self.http_client.patch(self.resolve_url(path));
        if let Some(body) = body {
            rb = rb.json(body);
        }
        self.execute(Method::PATCH, path, rb, config).await
    }

    /// DELETE request.
    pub async fn delete<T>(&self, path: &str, config: Option<RequestConfig>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let rb = self.http_client.delete(self.resolve_url(path));
        self.execute(Method::DELETE, path, rb, config).await
    }

    fn resolve_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Run one request through both interception stages.
    ///
    /// The activity guard is held for the whole request, so a failure at any
    /// point (header construction, dispatch, body read) still produces the
    /// matching decrement.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut rb: RequestBuilder,
        config: Option<RequestConfig>,
    ) -> Result<T> {
        let config = config.unwrap_or_default();
        let _guard = self.activity.begin();

        // 1. Auth injection, skipped for public endpoints
        if !auth::is_public_path(path, &self.config.public_paths) {
            if let Some(token) = self.token_store.get_token() {
                rb = rb.header(AUTHORIZATION, auth::bearer_value(&token)?);
            }
        }

        // 2. Per-call options
        if !config.headers.is_empty() {
            rb = rb.headers(build_header_map(&config.headers)?);
        }
        if let Some(timeout) = config.timeout {
            rb = rb.timeout(timeout);
        }

        // 3. Dispatch
        tracing::debug!(method = %method, path, "sending request");
        let response = rb.send().await.map_err(classify_transport_error)?;

        // 4. Response handling
        self.process_response(path, response, &config).await
    }

    async fn process_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
        config: &RequestConfig,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "request succeeded");
            return envelope::unwrap_data(&body).map_err(PipelineError::Json);
        }

        if status == StatusCode::UNAUTHORIZED {
            // Never notified; the caller still sees the error and the app
            // reacts through the hook.
            tracing::debug!(path, "authentication expired");
            self.token_store.clear_token();
            if let Some(hook) = &self.auth_hook {
                hook.on_auth_expired();
            }
            return Err(PipelineError::AuthExpired);
        }

        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(env) => {
                tracing::warn!(
                    path,
                    status = status.as_u16(),
                    code = env.code,
                    "server reported error"
                );
                if config.show_error_message {
                    if let Some(notifier) = &self.notifier {
                        notifier.error(&ErrorNote {
                            message: env.msg.clone(),
                            description: env.joined_details(),
                        });
                    }
                }
                Err(PipelineError::Api {
                    status: status.as_u16(),
                    code: env.code,
                    message: env.msg,
                    details: env.details.unwrap_or_default(),
                })
            }
            // No structured envelope, so nothing to notify with
            Err(_) => Err(PipelineError::Http(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ))),
        }
    }
}

fn classify_transport_error(e: reqwest::Error) -> PipelineError {
    if e.is_timeout() {
        PipelineError::Timeout(e.to_string())
    } else {
        PipelineError::Http(e.to_string())
    }
}

fn build_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            PipelineError::Configuration(format!("invalid header name '{key}': {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            PipelineError::Configuration(format!("invalid header value for '{key}': {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Builder for [`RequestPipeline`].
#[derive(Default)]
pub struct RequestPipelineBuilder {
    config: PipelineConfig,
    token_store: Option<Arc<dyn TokenStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    auth_hook: Option<Arc<dyn AuthExpiredHook>>,
}

impl RequestPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix prepended to relative request paths. Required.
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Request timeout. Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Header attached to every request.
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the public-path allow-list (exact suffix matches).
    pub fn public_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.public_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Add one public-path suffix to the allow-list.
    pub fn public_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.public_paths.push(path.into());
        self
    }

    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn on_auth_expired(mut self, hook: Arc<dyn AuthExpiredHook>) -> Self {
        self.auth_hook = Some(hook);
        self
    }

    /// Build the pipeline, constructing the underlying `reqwest::Client`.
    pub fn build(self) -> Result<RequestPipeline> {
        if self.config.base_url.is_empty() {
            return Err(PipelineError::Configuration(
                "base_url must not be empty".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder().timeout(self.config.effective_timeout());
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &self.config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        if !self.config.headers.is_empty() {
            builder = builder.default_headers(build_header_map(&self.config.headers)?);
        }
        let http_client = builder
            .build()
            .map_err(|e| PipelineError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(RequestPipeline {
            http_client,
            config: self.config,
            token_store: self
                .token_store
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
            notifier: self.notifier,
            auth_hook: self.auth_hook,
            activity: ActivityTracker::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> RequestPipeline {
        RequestPipeline::builder()
            .base_url("https://api.example.com/")
            .build()
            .unwrap()
    }

    #[test]
    fn resolve_url_joins_base_and_path() {
        let p = pipeline();
        assert_eq!(p.resolve_url("/users"), "https://api.example.com/users");
        assert_eq!(p.resolve_url("users"), "https://api.example.com/users");
    }

    #[test]
    fn build_rejects_empty_base_url() {
        let result = RequestPipeline::builder().build();
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn build_rejects_invalid_default_header() {
        let result = RequestPipeline::builder()
            .base_url("https://api.example.com")
            .header("bad header", "v")
            .build();
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }
}
