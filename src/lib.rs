//! reqpipe
//!
//! An async HTTP request pipeline for dashboard-style API clients. It wraps
//! `reqwest` with the cross-cutting concerns those clients need: bearer-auth
//! header injection with a public-path allow-list, aggregate loading-state
//! tracking, user-facing error notification, and auth-expiry signalling.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqpipe::prelude::*;
//!
//! let pipeline = RequestPipeline::builder()
//!     .base_url("https://api.example.com")
//!     .build()?;
//!
//! let user: UserProfile = pipeline.get("/users/me", None::<&()>, None).await?;
//! ```
#![deny(unsafe_code)]

pub mod activity;
pub mod auth;
pub mod batch;
pub mod config;
pub mod defaults;
pub mod envelope;
pub mod error;
pub mod hooks;
pub mod pipeline;

pub use error::{PipelineError, Result};
pub use pipeline::{RequestPipeline, RequestPipelineBuilder};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::activity::{ActivityTracker, LoadingListener};
    pub use crate::auth::{MemoryTokenStore, TokenStore};
    pub use crate::batch::{all, series};
    pub use crate::config::{PipelineConfig, RequestConfig};
    pub use crate::envelope::{ErrorEnvelope, Page, ResponseEnvelope};
    pub use crate::error::{PipelineError, Result};
    pub use crate::hooks::{AuthExpiredHook, ErrorNote, Notifier};
    pub use crate::pipeline::{RequestPipeline, RequestPipelineBuilder};
}
