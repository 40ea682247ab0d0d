//! Store types shared across modules

use serde::{Deserialize, Serialize};

/// Row counts for the CLI's `stats` view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub story_count: u64,
    pub remote_key_count: u64,
    pub has_session: bool,
}
