//! User-visible notices.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Something failed and the user should know.
    Error,
}

/// A message the UI should show once, e.g. as a toast.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Translation key of the message.
    pub key: String,
    /// Detail of the last failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// When the notice was raised.
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    /// Creates an error notice with the given translation key.
    #[must_use]
    pub fn error(key: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            key: key.into(),
            detail,
            timestamp: Utc::now(),
        }
    }
}
