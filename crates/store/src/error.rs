//! Typed error enum for the store layer.
//!
//! Callers can match on specific failure modes (SQL faults, corrupt rows,
//! migration problems) instead of downcasting opaque boxes.

use thiserror::Error;

/// Store-layer error covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQL / connection failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Row data could not be converted into a domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("database lock poisoned")]
    LockPoisoned,

    /// A blocking task could not be joined.
    #[error("blocking task join error: {0}")]
    TaskJoin(String),
}

impl StoreError {
    /// Whether this error is likely transient (worth retrying).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Database(rusqlite::Error::SqliteFailure(e, _))
                if matches!(e.code, rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
