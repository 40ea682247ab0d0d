//! Async facade over the blocking SQLite storage.
//!
//! Every method hops onto the tokio blocking pool, so callers on the async
//! runtime never hold a SQLite lock across an await point.

use std::path::Path;
use std::sync::Arc;

use storyfeed_core::{AuthSession, LoadType, RemoteKey, StoryItem};

use crate::error::{Result, StoreError};
use crate::storage::StoreInner;
use crate::types::StoreStats;

/// Run a blocking closure on the tokio blocking pool.
async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::TaskJoin(e.to_string()))?
}

/// Async-to-blocking delegation: clone the inner handle, move the (owned)
/// arguments into the closure, run on the blocking pool.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:ident)*) => {{
        let inner = Arc::clone(&$self.inner);
        blocking(move || inner.$method($(&$arg),*)).await
    }};
    (@val $self:ident, $method:ident $(, $arg:ident)*) => {{
        let inner = Arc::clone(&$self.inner);
        blocking(move || inner.$method($($arg),*)).await
    }};
}

/// Shared handle to the local story cache.
///
/// Cheap to clone; all clones use the same connection.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Open (or create) the database at `db_path` and run migrations.
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self { inner: Arc::new(StoreInner::new(db_path)?) })
    }

    /// Merge one fetched page into the cache in a single transaction.
    pub async fn merge_page(
        &self,
        load_type: LoadType,
        items: Vec<StoryItem>,
        prev_key: Option<u32>,
        next_key: Option<u32>,
    ) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        blocking(move || inner.merge_page(load_type, &items, prev_key, next_key)).await
    }

    /// Point lookup of an item's pagination keys.
    pub async fn remote_key(&self, id: String) -> Result<Option<RemoteKey>> {
        delegate!(self, remote_key, id)
    }

    /// Ordered window of cached stories.
    pub async fn stories(&self, offset: u64, limit: u64) -> Result<Vec<StoryItem>> {
        delegate!(@val self, stories, offset, limit)
    }

    pub async fn story_count(&self) -> Result<u64> {
        delegate!(@val self, story_count)
    }

    /// Bulk delete of both paging tables.
    pub async fn clear_stories(&self) -> Result<()> {
        delegate!(@val self, clear_stories)
    }

    pub async fn save_auth(&self, session: AuthSession) -> Result<()> {
        delegate!(self, save_auth, session)
    }

    pub async fn auth(&self) -> Result<Option<AuthSession>> {
        delegate!(@val self, auth)
    }

    pub async fn clear_auth(&self) -> Result<()> {
        delegate!(@val self, clear_auth)
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        delegate!(@val self, stats)
    }
}
