//! Typed error enum for the service layer.
//!
//! Unifies store and API failures into a single error type, so the CLI can
//! match on failure modes instead of downcasting opaque boxes.

use storyfeed_api::ApiError;
use storyfeed_store::StoreError;
use thiserror::Error;

/// Service-layer error unifying store and API failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Local storage operation failed.
    #[error("store: {0}")]
    Store(#[from] StoreError),

    /// Remote API call failed.
    #[error("api: {0}")]
    Api(#[from] ApiError),

    /// The operation requires a logged-in session and none is persisted.
    #[error("not logged in")]
    NotLoggedIn,

    /// Caller provided invalid input (empty credentials, unreadable photo).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            Self::Api(e) => e.is_transient(),
            _ => false,
        }
    }
}
