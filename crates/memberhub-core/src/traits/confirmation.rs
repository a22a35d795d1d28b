//! Non-blocking confirmation and notification prompts.

use std::fmt;

use async_trait::async_trait;

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Operation succeeded.
    Success,
    /// Informational message.
    Info,
    /// Something needs attention.
    Warning,
    /// Operation failed.
    Error,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A question put to the operator before a destructive or outward action.
#[derive(Debug, Clone)]
pub struct ConfirmRequest {
    /// Short title.
    pub title: String,
    /// Full question.
    pub message: String,
    /// Whether an unanswered prompt counts as "yes".
    pub default_yes: bool,
}

impl ConfirmRequest {
    /// Create a confirmation defaulting to "no".
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            default_yes: false,
        }
    }
}

/// Asynchronous confirmation/toast surface.
///
/// Implementations must not block the async executor; interactive ones
/// move the prompt onto a blocking thread.
#[async_trait]
pub trait Confirmation: Send + Sync {
    /// Ask the operator; resolves to `true` when confirmed.
    async fn confirm(&self, request: &ConfirmRequest) -> bool;

    /// Show a transient notification.
    async fn toast(&self, level: ToastLevel, message: &str);
}
