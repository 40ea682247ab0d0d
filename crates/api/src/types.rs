//! Wire types for the story service.
//!
//! Every response is wrapped in an `{error, message, ...}` envelope; an
//! `error: true` inside a 2xx is an application-level failure carrying
//! `message`.

use serde::Deserialize;
use storyfeed_core::StoryItem;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoriesResponse {
    pub error: bool,
    pub message: String,
    pub list_story: Option<Vec<StoryItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    pub error: bool,
    pub message: String,
    pub login_result: Option<LoginResult>,
}

/// Credentials returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub user_id: String,
    pub name: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    pub error: bool,
    pub message: String,
}

/// Payload for a story upload.
///
/// Uploads bypass the page cache entirely; a new story becomes visible only
/// after the next refresh.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub description: String,
    pub photo: Vec<u8>,
    pub file_name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}
