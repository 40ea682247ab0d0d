//! Typed error for load operations.

use storyfeed_api::ApiError;
use storyfeed_store::StoreError;
use thiserror::Error;

/// Why a load failed: the remote fetch, or the local merge/read.
///
/// Either way the cache is left exactly as it was before the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("remote source: {0}")]
    Source(#[from] ApiError),

    #[error("local store: {0}")]
    Store(#[from] StoreError),
}

impl LoadError {
    /// Whether re-issuing the identical load is likely to succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Source(e) => e.is_transient(),
            Self::Store(e) => e.is_transient(),
        }
    }
}
