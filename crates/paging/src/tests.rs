#[cfg(test)]
mod paging_tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use storyfeed_api::{ApiError, StoriesSource};
    use storyfeed_core::{LoadState, LoadType, StoryItem};
    use storyfeed_store::Store;

    use crate::mediator::{InitializeAction, MediatorResult, RemoteMediator};
    use crate::pager::{Pager, PagingEvent};
    use crate::state::{LoadedPage, PagingConfig, PagingState};

    /// Scripted remote source: a map of page number to items, an optional
    /// one-shot failure, and a log of every fetch attempt.
    struct FakeSource {
        pages: Mutex<HashMap<u32, Vec<StoryItem>>>,
        fail_next: Mutex<Option<ApiError>>,
        calls: Mutex<Vec<(u32, u32)>>,
    }

    impl FakeSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(HashMap::new()),
                fail_next: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            })
        }

        /// Split `total` sequentially-numbered stories into pages of
        /// `page_size`, numbered from 1.
        fn seed(&self, total: usize, page_size: usize) {
            let mut pages = self.pages.lock().unwrap();
            pages.clear();
            for (i, chunk) in (0..total)
                .collect::<Vec<_>>()
                .chunks(page_size)
                .enumerate()
            {
                pages.insert(i as u32 + 1, chunk.iter().copied().map(make_story).collect());
            }
        }

        fn fail_next(&self, err: ApiError) {
            *self.fail_next.lock().unwrap() = Some(err);
        }

        fn calls(&self) -> Vec<(u32, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StoriesSource for FakeSource {
        async fn stories_page(
            &self,
            page: u32,
            page_size: u32,
        ) -> Result<Vec<StoryItem>, ApiError> {
            self.calls.lock().unwrap().push((page, page_size));
            if let Some(err) = self.fail_next.lock().unwrap().take() {
                return Err(err);
            }
            Ok(self.pages.lock().unwrap().get(&page).cloned().unwrap_or_default())
        }
    }

    fn make_story(i: usize) -> StoryItem {
        StoryItem {
            id: i.to_string(),
            name: format!("name {}", i),
            description: format!("description {}", i),
            photo_url: format!("https://example.com/photo/{}.jpg", i),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, i as u32 % 60).unwrap(),
            lat: Some(i as f64),
            lon: Some(i as f64),
        }
    }

    fn open_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open(&temp_dir.path().join("paging.db")).unwrap();
        (store, temp_dir)
    }

    fn config() -> PagingConfig {
        PagingConfig { page_size: 5, prefetch_distance: 2 }
    }

    /// Rebuild a paging state from what the store currently holds, the way
    /// the pager does between loads.
    async fn state_from_store(store: &Store, anchor: Option<usize>) -> PagingState {
        let count = store.story_count().await.unwrap();
        let rows = store.stories(0, count).await.unwrap();
        PagingState {
            pages: rows.chunks(5).map(|c| LoadedPage { items: c.to_vec() }).collect(),
            anchor,
            config: config(),
        }
    }

    fn ids(items: &[StoryItem]) -> Vec<String> {
        items.iter().map(|s| s.id.clone()).collect()
    }

    fn id_range(range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|i| i.to_string()).collect()
    }

    fn simulated_outage() -> ApiError {
        ApiError::Status { code: 503, message: "service unavailable".to_owned() }
    }

    // ── mediator ─────────────────────────────────────────────────

    #[test]
    fn initialize_launches_initial_refresh() {
        let (store, _tmp) = open_store();
        let mediator = RemoteMediator::new(store, FakeSource::new());
        assert_eq!(mediator.initialize(), InitializeAction::LaunchInitialRefresh);
    }

    #[tokio::test]
    async fn initial_refresh_bootstraps_cache_with_keys() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        let result = mediator.load(LoadType::Refresh, &PagingState::new(config())).await;
        assert_eq!(result.end_of_pagination(), Some(false));

        let rows = store.stories(0, 10).await.unwrap();
        assert_eq!(ids(&rows), id_range(0..5));
        for id in id_range(0..5) {
            let key = store.remote_key(id).await.unwrap().unwrap();
            assert_eq!(key.prev_key, None);
            assert_eq!(key.next_key, Some(2));
        }
        assert_eq!(source.calls(), vec![(1, 5)]);
    }

    #[tokio::test]
    async fn appends_concatenate_in_fetch_order_without_duplicates() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(15, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        mediator.load(LoadType::Refresh, &PagingState::new(config())).await;
        let state = state_from_store(&store, None).await;
        mediator.load(LoadType::Append, &state).await;
        let state = state_from_store(&store, None).await;
        mediator.load(LoadType::Append, &state).await;

        let rows = store.stories(0, 100).await.unwrap();
        assert_eq!(ids(&rows), id_range(0..15));
        assert_eq!(source.calls(), vec![(1, 5), (2, 5), (3, 5)]);
    }

    #[tokio::test]
    async fn append_resolves_page_from_last_item_key() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        mediator.load(LoadType::Refresh, &PagingState::new(config())).await;
        let state = state_from_store(&store, None).await;
        let result = mediator.load(LoadType::Append, &state).await;

        assert_eq!(result.end_of_pagination(), Some(false));
        assert_eq!(source.calls().last(), Some(&(2, 5)));
    }

    #[tokio::test]
    async fn empty_append_reports_end_of_pagination() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        mediator.load(LoadType::Refresh, &PagingState::new(config())).await;
        let state = state_from_store(&store, None).await;
        mediator.load(LoadType::Append, &state).await;

        // Remote has exactly 10 items; page 3 is empty.
        let state = state_from_store(&store, None).await;
        let result = mediator.load(LoadType::Append, &state).await;

        assert_eq!(result.end_of_pagination(), Some(true));
        assert_eq!(store.story_count().await.unwrap(), 10);

        // The empty page stamped next_key = None onto nothing, but the last
        // real item's key is unchanged, so a further append re-resolves page
        // 3; callers stop on the end flag, as the pager does.
        assert_eq!(source.calls().last(), Some(&(3, 5)));
    }

    #[tokio::test]
    async fn reissued_append_is_idempotent() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        mediator.load(LoadType::Refresh, &PagingState::new(config())).await;
        let state = state_from_store(&store, None).await;
        mediator.load(LoadType::Append, &state).await;
        // Same resolved target page, unchanged remote state.
        mediator.load(LoadType::Append, &state).await;

        let rows = store.stories(0, 100).await.unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(ids(&rows), id_range(0..10));
        assert_eq!(source.calls(), vec![(1, 5), (2, 5), (2, 5)]);
    }

    #[tokio::test]
    async fn prepend_with_empty_cache_is_neutral_success() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let mediator = RemoteMediator::new(store, source.clone());

        let result = mediator.load(LoadType::Prepend, &PagingState::new(config())).await;

        assert_eq!(result.end_of_pagination(), Some(false));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn prepend_at_first_page_reports_end() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        mediator.load(LoadType::Refresh, &PagingState::new(config())).await;
        let state = state_from_store(&store, None).await;
        let result = mediator.load(LoadType::Prepend, &state).await;

        assert_eq!(result.end_of_pagination(), Some(true));
        // Only the refresh fetched; the prepend resolved from keys alone.
        assert_eq!(source.calls(), vec![(1, 5)]);
    }

    #[tokio::test]
    async fn prepend_fetches_previous_page_mid_collection() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(15, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        // Cache bootstrapped mid-collection: page 2 only.
        store
            .merge_page(LoadType::Refresh, (5..10).map(make_story).collect(), Some(1), Some(3))
            .await
            .unwrap();

        let state = state_from_store(&store, None).await;
        let result = mediator.load(LoadType::Prepend, &state).await;
        assert_eq!(result.end_of_pagination(), Some(false));
        assert_eq!(source.calls(), vec![(1, 5)]);

        let rows = store.stories(0, 100).await.unwrap();
        assert_eq!(ids(&rows), id_range(0..10));

        // Page 1 is the start of the collection; the next prepend ends.
        let state = state_from_store(&store, None).await;
        let result = mediator.load(LoadType::Prepend, &state).await;
        assert_eq!(result.end_of_pagination(), Some(true));
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_prepend_leaves_store_untouched() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(15, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        store
            .merge_page(LoadType::Refresh, (5..10).map(make_story).collect(), Some(1), Some(3))
            .await
            .unwrap();
        let before = ids(&store.stories(0, 100).await.unwrap());

        source.fail_next(simulated_outage());
        let state = state_from_store(&store, None).await;
        let result = mediator.load(LoadType::Prepend, &state).await;

        match result {
            MediatorResult::Error(e) => assert!(e.to_string().contains("503")),
            MediatorResult::Success { .. } => panic!("expected error"),
        }
        assert_eq!(ids(&store.stories(0, 100).await.unwrap()), before);
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.story_count, 5);
        assert_eq!(stats.remote_key_count, 5);
    }

    #[tokio::test]
    async fn refresh_recenters_on_anchor_and_replaces_cache() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(20, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        mediator.load(LoadType::Refresh, &PagingState::new(config())).await;
        let state = state_from_store(&store, None).await;
        mediator.load(LoadType::Append, &state).await;
        let state = state_from_store(&store, None).await;
        mediator.load(LoadType::Append, &state).await;
        assert_eq!(store.story_count().await.unwrap(), 15);

        // Anchor on item "7" (page 2, next_key = 3): refresh targets page 2,
        // not page 1, preserving the user's scroll context.
        let state = state_from_store(&store, Some(7)).await;
        let result = mediator.load(LoadType::Refresh, &state).await;

        assert_eq!(result.end_of_pagination(), Some(false));
        assert_eq!(source.calls().last(), Some(&(2, 5)));
        let rows = store.stories(0, 100).await.unwrap();
        assert_eq!(ids(&rows), id_range(5..10));
    }

    #[tokio::test]
    async fn refresh_without_anchor_on_populated_cache_starts_at_page_one() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let mediator = RemoteMediator::new(store.clone(), source.clone());

        store
            .merge_page(LoadType::Refresh, (5..10).map(make_story).collect(), Some(1), Some(3))
            .await
            .unwrap();

        let state = state_from_store(&store, None).await;
        mediator.load(LoadType::Refresh, &state).await;

        assert_eq!(source.calls(), vec![(1, 5)]);
        assert_eq!(ids(&store.stories(0, 100).await.unwrap()), id_range(0..5));
    }

    // ── pager ────────────────────────────────────────────────────

    fn build_pager(store: &Store, source: &Arc<FakeSource>) -> Pager {
        let source: Arc<dyn StoriesSource> = source.clone();
        let mediator = RemoteMediator::new(store.clone(), source);
        Pager::new(mediator, store.clone(), config())
    }

    #[tokio::test]
    async fn attach_runs_initial_refresh() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let pager = build_pager(&store, &source);

        let result = pager.attach().await;

        assert!(result.is_success());
        assert_eq!(ids(&pager.snapshot()), id_range(0..5));
        assert_eq!(
            pager.load_state(LoadType::Refresh),
            LoadState::Success { end_of_pagination: false }
        );
    }

    #[tokio::test]
    async fn anchor_near_end_triggers_append() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(15, 5);
        let pager = build_pager(&store, &source);
        pager.attach().await;

        let result = pager.set_anchor(4).await.expect("append should launch");

        assert!(result.is_success());
        assert_eq!(ids(&pager.snapshot()), id_range(0..10));
    }

    #[tokio::test]
    async fn anchor_mid_window_triggers_nothing() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(25, 5);
        let pager = build_pager(&store, &source);
        pager.attach().await;
        pager.set_anchor(4).await;
        assert_eq!(pager.snapshot().len(), 10);

        // Comfortably inside the loaded window: no load in either direction.
        assert!(pager.set_anchor(5).await.is_none());
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn exhausted_edge_is_not_retried() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(5, 5);
        let pager = build_pager(&store, &source);
        pager.attach().await;

        // Page 2 is empty: append reports end of pagination.
        let result = pager.set_anchor(4).await.expect("append should launch");
        assert_eq!(result.end_of_pagination(), Some(true));
        assert_eq!(pager.snapshot().len(), 5);

        // Same edge again: the pager must not re-dispatch an append.
        assert!(pager.set_anchor(4).await.is_none());
        assert_eq!(source.calls(), vec![(1, 5), (2, 5)]);
    }

    #[tokio::test]
    async fn refresh_resets_exhausted_edges() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(5, 5);
        let pager = build_pager(&store, &source);
        pager.attach().await;
        pager.set_anchor(4).await;
        assert!(pager.load_state(LoadType::Append).end_of_pagination());

        pager.refresh().await;

        assert_eq!(pager.load_state(LoadType::Append), LoadState::NotLoading);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_window_visible() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(15, 5);
        let pager = build_pager(&store, &source);
        pager.attach().await;
        let before = pager.snapshot();

        source.fail_next(simulated_outage());
        let result = pager.set_anchor(4).await.expect("append should launch");

        assert!(!result.is_success());
        assert_eq!(ids(&pager.snapshot()), ids(&before));
        assert!(matches!(pager.load_state(LoadType::Append), LoadState::Error(_)));

        // Manual retry re-issues the identical load and recovers.
        let result = pager.set_anchor(4).await.expect("retry should launch");
        assert!(result.is_success());
        assert_eq!(pager.snapshot().len(), 10);
    }

    #[tokio::test]
    async fn subscribers_observe_updates_and_load_states() {
        let (store, _tmp) = open_store();
        let source = FakeSource::new();
        source.seed(10, 5);
        let pager = build_pager(&store, &source);
        let mut rx = pager.subscribe();

        pager.attach().await;

        let mut saw_loading = false;
        let mut saw_update = false;
        let mut saw_success = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                PagingEvent::LoadState { load_type: LoadType::Refresh, state } => match state {
                    LoadState::Loading => saw_loading = true,
                    LoadState::Success { .. } => saw_success = true,
                    _ => {},
                },
                PagingEvent::Updated { item_count } => {
                    saw_update = true;
                    assert_eq!(item_count, 5);
                },
                PagingEvent::LoadState { .. } => {},
            }
        }
        assert!(saw_loading && saw_update && saw_success);
    }
}
