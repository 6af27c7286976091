//! Collaborator seams for UI-facing side effects.
//!
//! The pipeline never talks to a toast system or a router directly; the
//! embedding application provides these hooks. Auth expiry is additionally
//! surfaced to callers as [`PipelineError::AuthExpired`](crate::PipelineError::AuthExpired).

/// A user-facing error notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNote {
    /// Short headline, taken from the error envelope's message.
    pub message: String,
    /// Detail lines joined with newlines, when the envelope carries any.
    pub description: Option<String>,
}

/// Notification collaborator. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn error(&self, note: &ErrorNote);
}

/// Invoked after an authentication failure has cleared the stored token.
/// Applications typically wire this to a redirect to their login view.
pub trait AuthExpiredHook: Send + Sync {
    fn on_auth_expired(&self);
}
