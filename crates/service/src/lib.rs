//! Service layer for storyfeed
//!
//! Thin orchestration between the CLI front end and the store/api/paging
//! crates. Services are constructed once at application start and shared by
//! cloning; there are no lazily-initialized globals.

mod error;
mod session_service;
mod story_service;

pub use error::ServiceError;
pub use session_service::SessionService;
pub use story_service::StoryService;
