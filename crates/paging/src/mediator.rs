//! The remote mediator: decides which page each load should fetch and
//! merges the result into the local store.

use std::sync::Arc;

use storyfeed_api::StoriesSource;
use storyfeed_core::constants::INITIAL_PAGE;
use storyfeed_core::{LoadType, RemoteKey, StoryItem};
use storyfeed_store::{Store, StoreError};

use crate::error::LoadError;
use crate::state::PagingState;

/// What a pager must do when it first attaches to this mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeAction {
    /// Run a REFRESH before trusting any cached data.
    LaunchInitialRefresh,
    /// Serve cached data as-is.
    SkipInitialRefresh,
}

/// Outcome of one load. Failures never escape as panics or raw errors;
/// they are folded into the `Error` arm with their cause attached.
#[derive(Debug)]
pub enum MediatorResult {
    Success { end_of_pagination: bool },
    Error(LoadError),
}

impl MediatorResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// `Some(true)` once a successful load hit the end of the collection in
    /// its direction; `None` on error.
    #[must_use]
    pub const fn end_of_pagination(&self) -> Option<bool> {
        match self {
            Self::Success { end_of_pagination } => Some(*end_of_pagination),
            Self::Error(_) => None,
        }
    }
}

/// One remote fetch, tagged with the page number it was requested with.
struct FetchedPage {
    number: u32,
    items: Vec<StoryItem>,
}

/// Orchestrates REFRESH / PREPEND / APPEND against the remote source and
/// the local store.
///
/// The store is this mediator's exclusive write surface: every merge goes
/// through one transaction that writes items and their remote keys
/// together, clearing both tables first on refresh.
pub struct RemoteMediator {
    store: Store,
    source: Arc<dyn StoriesSource>,
}

impl RemoteMediator {
    #[must_use]
    pub fn new(store: Store, source: Arc<dyn StoriesSource>) -> Self {
        Self { store, source }
    }

    /// Consulted once per pager attach. Locally persisted data is never
    /// trusted without one confirmatory refresh per session start.
    #[must_use]
    pub const fn initialize(&self) -> InitializeAction {
        InitializeAction::LaunchInitialRefresh
    }

    /// Resolve the target page for `load_type`, fetch it, and merge it.
    ///
    /// Returns control only on completion; there is no fire-and-forget
    /// path, and no internal retry. Re-issuing the identical load is the
    /// caller's decision.
    pub async fn load(&self, load_type: LoadType, state: &PagingState) -> MediatorResult {
        match self.load_inner(load_type, state).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(load_type = load_type.as_str(), error = %e, "load failed");
                MediatorResult::Error(e)
            },
        }
    }

    async fn load_inner(
        &self,
        load_type: LoadType,
        state: &PagingState,
    ) -> Result<MediatorResult, LoadError> {
        let page = match load_type {
            LoadType::Refresh => self
                .remote_key_closest_to_anchor(state)
                .await?
                .and_then(|key| key.next_key)
                .map_or(INITIAL_PAGE, |next| next - 1),

            LoadType::Prepend => {
                // No key at all means nothing is loaded yet: a neutral
                // success, distinct from having reached the first page.
                match self.remote_key_for_first_item(state).await? {
                    None => return Ok(MediatorResult::Success { end_of_pagination: false }),
                    Some(key) => match key.prev_key {
                        None => return Ok(MediatorResult::Success { end_of_pagination: true }),
                        Some(prev) => prev,
                    },
                }
            },

            LoadType::Append => match self.remote_key_for_last_item(state).await? {
                None => return Ok(MediatorResult::Success { end_of_pagination: false }),
                Some(key) => match key.next_key {
                    None => return Ok(MediatorResult::Success { end_of_pagination: true }),
                    Some(next) => next,
                },
            },
        };

        tracing::debug!(load_type = load_type.as_str(), page, "fetching remote page");
        let fetched = FetchedPage {
            number: page,
            items: self.source.stories_page(page, state.config.page_size).await?,
        };

        let prev_key = (fetched.number > INITIAL_PAGE).then(|| fetched.number - 1);
        let next_key = (!fetched.items.is_empty()).then(|| fetched.number + 1);
        let end_of_pagination = fetched.items.is_empty();

        self.store.merge_page(load_type, fetched.items, prev_key, next_key).await?;

        tracing::debug!(
            load_type = load_type.as_str(),
            page,
            end_of_pagination,
            "page merged"
        );
        Ok(MediatorResult::Success { end_of_pagination })
    }

    async fn remote_key_for_first_item(
        &self,
        state: &PagingState,
    ) -> Result<Option<RemoteKey>, StoreError> {
        match state.first_item() {
            Some(item) => self.store.remote_key(item.id.clone()).await,
            None => Ok(None),
        }
    }

    async fn remote_key_for_last_item(
        &self,
        state: &PagingState,
    ) -> Result<Option<RemoteKey>, StoreError> {
        match state.last_item() {
            Some(item) => self.store.remote_key(item.id.clone()).await,
            None => Ok(None),
        }
    }

    async fn remote_key_closest_to_anchor(
        &self,
        state: &PagingState,
    ) -> Result<Option<RemoteKey>, StoreError> {
        let Some(anchor) = state.anchor else {
            return Ok(None);
        };
        match state.closest_item_to(anchor) {
            Some(item) => self.store.remote_key(item.id.clone()).await,
            None => Ok(None),
        }
    }
}
