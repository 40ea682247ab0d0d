//! Local store for storyfeed
//!
//! SQLite-backed persistence for the paged story cache (items plus their
//! remote pagination keys) and the auth session. All multi-table writes go
//! through a single transaction; readers never observe a half-merged page.

mod error;
mod migrations;
mod storage;
mod store;
mod types;

pub use error::{Result, StoreError};
pub use store::Store;
pub use types::StoreStats;
