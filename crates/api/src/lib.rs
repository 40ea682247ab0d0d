//! Remote source for storyfeed
//!
//! reqwest-based client for the story service: login/register, paginated
//! story fetch, geotagged story fetch, and multipart upload. The paging
//! layer consumes only the [`StoriesSource`] seam.

mod client;
mod error;
mod source;
mod types;

pub use client::{Client, truncate};
pub use error::ApiError;
pub use source::StoriesSource;
pub use types::{LoginResult, NewStory};
