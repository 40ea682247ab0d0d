use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One story record fetched from the remote service.
///
/// Rows are created or overwritten only by a successful page merge; fields
/// are never mutated individually. Identity is the server-assigned `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryItem {
    /// Unique identifier, stable across fetches
    pub id: String,
    /// Display name of the author
    pub name: String,
    /// Free-form story text
    pub description: String,
    /// URL of the uploaded photo
    pub photo_url: String,
    /// When the story was created on the server
    pub created_at: DateTime<Utc>,
    /// Latitude of the optional geotag
    pub lat: Option<f64>,
    /// Longitude of the optional geotag
    pub lon: Option<f64>,
}

impl StoryItem {
    /// Whether this story carries a complete geotag.
    #[must_use]
    pub const fn has_location(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// Per-item pagination metadata.
///
/// Every cached [`StoryItem`] has exactly one `RemoteKey` row, written in
/// the same transaction as the item. All items fetched in one page share an
/// identical (`prev_key`, `next_key`) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteKey {
    /// Id of the story this key belongs to
    pub id: String,
    /// Page to fetch when loading items before this one; `None` at the
    /// start of the collection
    pub prev_key: Option<u32>,
    /// Page to fetch when loading items after this one; `None` at the end
    /// of the collection
    pub next_key: Option<u32>,
}
