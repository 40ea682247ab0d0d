//! The paged view: streams the local cache to a UI collaborator and drives
//! the mediator when the anchor nears an edge of loaded data.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use storyfeed_core::constants::PAGER_EVENT_CAPACITY;
use storyfeed_core::{LoadState, LoadType, StoryItem};
use storyfeed_store::{Store, StoreError};

use crate::error::LoadError;
use crate::mediator::{InitializeAction, MediatorResult, RemoteMediator};
use crate::state::{LoadedPage, PagingConfig, PagingState};

/// Events published to pager subscribers.
///
/// Subscribers that fall behind the channel capacity see `Lagged` and
/// should resync from [`Pager::snapshot`].
#[derive(Debug, Clone)]
pub enum PagingEvent {
    /// The loaded window changed; take a fresh snapshot.
    Updated { item_count: usize },
    /// A load transitioned state.
    LoadState { load_type: LoadType, state: LoadState },
}

#[derive(Debug)]
struct PagerShared {
    pages: Vec<LoadedPage>,
    anchor: Option<usize>,
    refresh: LoadState,
    prepend: LoadState,
    append: LoadState,
}

impl PagerShared {
    fn state_mut(&mut self, load_type: LoadType) -> &mut LoadState {
        match load_type {
            LoadType::Refresh => &mut self.refresh,
            LoadType::Prepend => &mut self.prepend,
            LoadType::Append => &mut self.append,
        }
    }

    fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }
}

/// Observable, restartable paged read over the local store.
///
/// The store is the single source of truth: after every successful merge
/// the pager re-reads its window from SQLite and republishes it, so
/// subscribers never observe a half-merged page. Load dispatch is
/// serialized; refresh, prepend and append never race on the same state.
pub struct Pager {
    mediator: RemoteMediator,
    store: Store,
    config: PagingConfig,
    shared: Mutex<PagerShared>,
    load_gate: tokio::sync::Mutex<()>,
    events: broadcast::Sender<PagingEvent>,
}

impl Pager {
    #[must_use]
    pub fn new(mediator: RemoteMediator, store: Store, config: PagingConfig) -> Self {
        let (events, _) = broadcast::channel(PAGER_EVENT_CAPACITY);
        Self {
            mediator,
            store,
            config,
            shared: Mutex::new(PagerShared {
                pages: Vec::new(),
                anchor: None,
                refresh: LoadState::NotLoading,
                prepend: LoadState::NotLoading,
                append: LoadState::NotLoading,
            }),
            load_gate: tokio::sync::Mutex::new(()),
            events,
        }
    }

    /// First attachment of a UI session. Consults the mediator's
    /// initialization contract and, in the usual case, launches the initial
    /// refresh before any cached data is trusted.
    pub async fn attach(&self) -> MediatorResult {
        match self.mediator.initialize() {
            InitializeAction::LaunchInitialRefresh => self.dispatch(LoadType::Refresh).await,
            InitializeAction::SkipInitialRefresh => match self.reload_window().await {
                Ok(()) => MediatorResult::Success { end_of_pagination: false },
                Err(e) => MediatorResult::Error(LoadError::Store(e)),
            },
        }
    }

    /// Manual reload, re-centered on the current anchor.
    pub async fn refresh(&self) -> MediatorResult {
        self.dispatch(LoadType::Refresh).await
    }

    /// Record the index of the item closest to the user's viewport and, when
    /// it nears a loaded edge that has not reported end-of-pagination,
    /// launch the corresponding directional load.
    pub async fn set_anchor(&self, position: usize) -> Option<MediatorResult> {
        let load_type = {
            let mut shared = self.lock_shared();
            let count = shared.item_count();
            if count == 0 {
                shared.anchor = Some(position);
                return None;
            }
            let clamped = position.min(count - 1);
            shared.anchor = Some(clamped);

            if clamped + self.config.prefetch_distance >= count
                && !shared.append.end_of_pagination()
            {
                LoadType::Append
            } else if clamped < self.config.prefetch_distance
                && !shared.prepend.end_of_pagination()
            {
                LoadType::Prepend
            } else {
                return None;
            }
        };

        Some(self.dispatch(load_type).await)
    }

    /// Current loaded items, in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StoryItem> {
        let shared = self.lock_shared();
        shared.pages.iter().flat_map(|p| p.items.iter().cloned()).collect()
    }

    /// Current state of one load direction.
    #[must_use]
    pub fn load_state(&self, load_type: LoadType) -> LoadState {
        let mut shared = self.lock_shared();
        shared.state_mut(load_type).clone()
    }

    /// Subscribe to paging events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PagingEvent> {
        self.events.subscribe()
    }

    async fn dispatch(&self, load_type: LoadType) -> MediatorResult {
        let _gate = self.load_gate.lock().await;

        self.set_state(load_type, LoadState::Loading);
        let state = self.paging_state();
        let result = self.mediator.load(load_type, &state).await;

        match result {
            MediatorResult::Success { end_of_pagination } => {
                if let Err(e) = self.reload_window().await {
                    let err = LoadError::Store(e);
                    self.set_state(load_type, LoadState::Error(err.to_string()));
                    return MediatorResult::Error(err);
                }
                if load_type == LoadType::Refresh {
                    self.reset_edges();
                }
                self.set_state(load_type, LoadState::Success { end_of_pagination });
                MediatorResult::Success { end_of_pagination }
            },
            MediatorResult::Error(err) => {
                self.set_state(load_type, LoadState::Error(err.to_string()));
                MediatorResult::Error(err)
            },
        }
    }

    /// Re-read the loaded window from the store and republish it.
    async fn reload_window(&self) -> Result<(), StoreError> {
        let count = self.store.story_count().await?;
        let rows = self.store.stories(0, count).await?;

        let page_size = self.config.page_size.max(1) as usize;
        let item_count = rows.len();
        let pages: Vec<LoadedPage> =
            rows.chunks(page_size).map(|c| LoadedPage { items: c.to_vec() }).collect();

        {
            let mut shared = self.lock_shared();
            shared.pages = pages;
            if let Some(anchor) = shared.anchor {
                shared.anchor = Some(anchor.min(item_count.saturating_sub(1)));
            }
        }
        let _ = self.events.send(PagingEvent::Updated { item_count });
        Ok(())
    }

    /// A refresh invalidates what both edges knew about pagination ends.
    fn reset_edges(&self) {
        self.set_state(LoadType::Prepend, LoadState::NotLoading);
        self.set_state(LoadType::Append, LoadState::NotLoading);
    }

    fn set_state(&self, load_type: LoadType, state: LoadState) {
        {
            let mut shared = self.lock_shared();
            *shared.state_mut(load_type) = state.clone();
        }
        let _ = self.events.send(PagingEvent::LoadState { load_type, state });
    }

    fn paging_state(&self) -> PagingState {
        let shared = self.lock_shared();
        PagingState {
            pages: shared.pages.clone(),
            anchor: shared.anchor,
            config: self.config.clone(),
        }
    }

    /// The shared state is only held for short, non-panicking sections; if a
    /// panic elsewhere still poisons it, recover the data rather than
    /// cascading the panic into every reader.
    fn lock_shared(&self) -> MutexGuard<'_, PagerShared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
