//! Typed error enum for the API crate.

use thiserror::Error;

/// Errors from story-service API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP status {code}: {message}")]
    Status { code: u16, message: String },
    #[error("API error: {0}")]
    Api(String),
    #[error("JSON parse error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing response body field: {0}")]
    EmptyBody(&'static str),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("not authenticated: no token on this client")]
    NotAuthenticated,
}

impl ApiError {
    /// Whether this error is transient and worth a caller-driven retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}
