//! Shared constants for storyfeed.
//!
//! Centralizes paging and transport numbers used by more than one crate.

/// First page number of the remote API's pagination.
pub const INITIAL_PAGE: u32 = 1;

/// Default number of items per fetched page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Hard cap on the page size accepted by the remote service.
pub const MAX_PAGE_SIZE: u32 = 100;

/// How close (in items) the anchor may get to a loaded edge before the
/// pager requests the next page in that direction.
pub const DEFAULT_PREFETCH_DISTANCE: usize = 2;

/// Request timeout for all HTTP calls, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Capacity of the pager's event channel. Slow subscribers that fall more
/// than this many events behind start seeing `Lagged` and must resync from
/// a fresh snapshot.
pub const PAGER_EVENT_CAPACITY: usize = 64;
