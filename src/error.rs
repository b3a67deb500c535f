//! Manager error types with stable numeric codes.
//!
//! [`ManagerError`] is the central error type of the crate. Registry and
//! transport operations never return it to callers (failures there are
//! logged and surfaced as socket events); it is produced by the REST
//! client, the session store, the translator and configuration loading.

/// Crate-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category          |
/// |-----------|-------------------|
/// | 1000–1999 | Input / config    |
/// | 2000–2999 | Transport         |
/// | 3000–3999 | Remote API        |
/// | 4000–4999 | Local storage     |
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// Endpoint string could not be turned into a usable URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration value was present but unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input rejected before any request was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Opening a transport did not finish within the connection timeout.
    #[error("connection timed out after {timeout_ms} ms")]
    ConnectTimeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The real-time transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API rejected the credentials.
    #[error("unauthorized: check the API key")]
    Unauthorized,

    /// The API answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// HTTP client failure (connect, timeout, body decoding).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ManagerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidEndpoint(_) => 1001,
            Self::Config(_) => 1002,
            Self::Serialization(_) => 1003,
            Self::Validation(_) => 1004,
            Self::ConnectTimeout { .. } => 2001,
            Self::Transport(_) => 2002,
            Self::Http(_) => 3000,
            Self::Api { .. } => 3001,
            Self::Unauthorized => 3002,
            Self::Storage(_) => 4001,
            Self::Io(_) => 4002,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_ranges() {
        assert_eq!(ManagerError::InvalidEndpoint("x".into()).error_code(), 1001);
        assert_eq!(ManagerError::Validation("x".into()).error_code(), 1004);
        assert_eq!(ManagerError::ConnectTimeout { timeout_ms: 5 }.error_code(), 2001);
        assert_eq!(ManagerError::Unauthorized.error_code(), 3002);
        assert_eq!(ManagerError::Storage("disk".into()).error_code(), 4001);
    }
}
