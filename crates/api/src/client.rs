use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use storyfeed_core::StoryItem;
use storyfeed_core::constants::HTTP_TIMEOUT_SECS;

use crate::error::ApiError;
use crate::types::{LoginResponse, LoginResult, MessageResponse, NewStory, StoriesResponse};

/// Client for the story service API.
///
/// Authenticated endpoints require a token attached via [`Client::with_token`];
/// the service issues one per login. No retry happens here: a failed call is
/// reported once and the caller decides whether to re-issue it.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Client {
    /// Creates an unauthenticated client for the service at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::ClientInit(e.to_string()))?;
        Ok(Self { http, base_url, token: None })
    }

    /// Attaches a Bearer token for authenticated endpoints.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::NotAuthenticated)
    }

    /// Decode a response body, mapping non-2xx statuses to [`ApiError::Status`]
    /// with the server's `message` when one can be extracted.
    async fn decode_body<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<MessageResponse>(&body)
                .map(|m| m.message)
                .unwrap_or_else(|_| truncate(&body, 200).to_owned());
            return Err(ApiError::Status { code: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            context: format!("{} (body: {})", context, truncate(&body, 200)),
            source: e,
        })
    }

    /// Authenticate and obtain a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, ApiError> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .form(&[("email", email), ("password", password)])
            .send()
            .await?;

        let body: LoginResponse = Self::decode_body(response, "login response").await?;
        if body.error {
            return Err(ApiError::Api(body.message));
        }
        body.login_result.ok_or(ApiError::EmptyBody("loginResult"))
    }

    /// Create a new account.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .form(&[("name", name), ("email", email), ("password", password)])
            .send()
            .await?;

        let body: MessageResponse = Self::decode_body(response, "register response").await?;
        if body.error {
            return Err(ApiError::Api(body.message));
        }
        Ok(())
    }

    /// Fetch one page of stories.
    ///
    /// `page` is 1-based. An empty list is a valid outcome (end of the
    /// collection); an absent `listStory` field is a decode failure.
    pub async fn stories(&self, page: u32, page_size: u32) -> Result<Vec<StoryItem>, ApiError> {
        let response = self
            .http
            .get(format!("{}/stories", self.base_url))
            .query(&[("page", page), ("size", page_size)])
            .bearer_auth(self.bearer()?)
            .send()
            .await?;

        let body: StoriesResponse = Self::decode_body(response, "stories response").await?;
        if body.error {
            return Err(ApiError::Api(body.message));
        }
        body.list_story.ok_or(ApiError::EmptyBody("listStory"))
    }

    /// Fetch all stories that carry a geotag (server-side filter).
    pub async fn stories_with_location(&self) -> Result<Vec<StoryItem>, ApiError> {
        let response = self
            .http
            .get(format!("{}/stories", self.base_url))
            .query(&[("location", 1)])
            .bearer_auth(self.bearer()?)
            .send()
            .await?;

        let body: StoriesResponse = Self::decode_body(response, "location stories response").await?;
        if body.error {
            return Err(ApiError::Api(body.message));
        }
        body.list_story.ok_or(ApiError::EmptyBody("listStory"))
    }

    /// Upload a new story as multipart form data.
    pub async fn upload_story(&self, story: NewStory) -> Result<(), ApiError> {
        let photo = Part::bytes(story.photo)
            .file_name(story.file_name)
            .mime_str("image/jpeg")?;

        let mut form = Form::new().text("description", story.description).part("photo", photo);
        if let Some(lat) = story.lat {
            form = form.text("lat", lat.to_string());
        }
        if let Some(lon) = story.lon {
            form = form.text("lon", lon.to_string());
        }

        let response = self
            .http
            .post(format!("{}/stories", self.base_url))
            .bearer_auth(self.bearer()?)
            .multipart(form)
            .send()
            .await?;

        let body: MessageResponse = Self::decode_body(response, "upload response").await?;
        if body.error {
            return Err(ApiError::Api(body.message));
        }
        tracing::info!("story uploaded");
        Ok(())
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
