//! Paging state handed to the mediator with each load request.

use storyfeed_core::StoryItem;
use storyfeed_core::constants::{DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_DISTANCE};

/// Tuning for one pager.
#[derive(Debug, Clone)]
pub struct PagingConfig {
    /// Items per fetched page.
    pub page_size: u32,
    /// How close the anchor may get to a loaded edge before the pager
    /// requests the next page in that direction.
    pub prefetch_distance: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, prefetch_distance: DEFAULT_PREFETCH_DISTANCE }
    }
}

/// One bounded window of loaded items.
#[derive(Debug, Clone, Default)]
pub struct LoadedPage {
    pub items: Vec<StoryItem>,
}

/// Snapshot of everything a pager has loaded, plus the user's anchor.
///
/// The mediator treats this as read-only input; helpers here are pure
/// queries with no side effects.
#[derive(Debug, Clone)]
pub struct PagingState {
    /// Loaded windows in display order.
    pub pages: Vec<LoadedPage>,
    /// Index of the item closest to the user's viewport, within the
    /// flattened loaded items. `None` until the UI reports one.
    pub anchor: Option<usize>,
    pub config: PagingConfig,
}

impl PagingState {
    #[must_use]
    pub fn new(config: PagingConfig) -> Self {
        Self { pages: Vec::new(), anchor: None, config }
    }

    /// Total loaded items across all pages.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    /// First item of the first non-empty loaded page.
    #[must_use]
    pub fn first_item(&self) -> Option<&StoryItem> {
        self.pages.iter().find(|p| !p.items.is_empty()).and_then(|p| p.items.first())
    }

    /// Last item of the last non-empty loaded page.
    #[must_use]
    pub fn last_item(&self) -> Option<&StoryItem> {
        self.pages.iter().rev().find(|p| !p.items.is_empty()).and_then(|p| p.items.last())
    }

    /// The loaded item whose position is closest to `anchor` (the anchor is
    /// clamped into the loaded range). `None` when nothing is loaded.
    #[must_use]
    pub fn closest_item_to(&self, anchor: usize) -> Option<&StoryItem> {
        let count = self.item_count();
        if count == 0 {
            return None;
        }
        let index = anchor.min(count - 1);
        self.pages.iter().flat_map(|p| p.items.iter()).nth(index)
    }
}
