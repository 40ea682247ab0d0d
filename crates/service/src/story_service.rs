use std::sync::Arc;

use storyfeed_api::{Client, NewStory};
use storyfeed_core::StoryItem;
use storyfeed_paging::{Pager, PagingConfig, RemoteMediator};
use storyfeed_store::Store;

use crate::error::ServiceError;

/// Story listing, upload and map data for a logged-in user.
///
/// Authenticated clients are built per call from the session token, the way
/// the service issues them.
pub struct StoryService {
    store: Store,
    base_url: String,
}

impl StoryService {
    #[must_use]
    pub fn new(store: Store, base_url: impl Into<String>) -> Self {
        Self { store, base_url: base_url.into() }
    }

    fn client(&self, token: &str) -> Result<Client, ServiceError> {
        Ok(Client::new(self.base_url.as_str())?.with_token(token))
    }

    /// Build the paged story view backed by the local cache and the remote
    /// source. The caller attaches it and drives it with anchor updates.
    pub fn pager(&self, token: &str, config: PagingConfig) -> Result<Pager, ServiceError> {
        let client = self.client(token)?;
        let mediator = RemoteMediator::new(self.store.clone(), Arc::new(client));
        Ok(Pager::new(mediator, self.store.clone(), config))
    }

    /// Upload a new story. The cache is not updated optimistically; the
    /// story shows up after the next refresh.
    pub async fn upload(&self, token: &str, story: NewStory) -> Result<(), ServiceError> {
        if story.description.trim().is_empty() {
            return Err(ServiceError::InvalidInput("description is required".to_owned()));
        }
        if story.photo.is_empty() {
            return Err(ServiceError::InvalidInput("photo is empty".to_owned()));
        }
        self.client(token)?.upload_story(story).await?;
        Ok(())
    }

    /// All geotagged stories, fetched straight from the remote service for
    /// map display; this read does not touch the page cache.
    pub async fn locations(&self, token: &str) -> Result<Vec<StoryItem>, ServiceError> {
        Ok(self.client(token)?.stories_with_location().await?)
    }
}
