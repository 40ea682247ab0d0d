//! Remote-backed paging for storyfeed
//!
//! The [`RemoteMediator`] reconciles the local SQLite cache with the remote
//! paginated API: it resolves which page each REFRESH / PREPEND / APPEND
//! should fetch from the per-item remote keys, and merges fetched pages into
//! the store in one transaction. The [`Pager`] streams the cache to a UI
//! collaborator as bounded windows and drives the mediator when the anchor
//! nears an edge of loaded data.

mod error;
mod mediator;
mod pager;
mod state;
#[cfg(test)]
mod tests;

pub use error::LoadError;
pub use mediator::{InitializeAction, MediatorResult, RemoteMediator};
pub use pager::{Pager, PagingEvent};
pub use state::{LoadedPage, PagingConfig, PagingState};
