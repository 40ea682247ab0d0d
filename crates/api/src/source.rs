//! The one seam the paging layer consumes.

use async_trait::async_trait;
use storyfeed_core::StoryItem;

use crate::client::Client;
use crate::error::ApiError;

/// Paginated fetch capability: given a 1-based page number and a page size,
/// return that page's items in order, or fail. Tests substitute a scripted
/// implementation.
#[async_trait]
pub trait StoriesSource: Send + Sync {
    async fn stories_page(&self, page: u32, page_size: u32) -> Result<Vec<StoryItem>, ApiError>;
}

#[async_trait]
impl StoriesSource for Client {
    async fn stories_page(&self, page: u32, page_size: u32) -> Result<Vec<StoryItem>, ApiError> {
        self.stories(page, page_size).await
    }
}
