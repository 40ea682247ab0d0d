use serde::{Deserialize, Serialize};

/// Directional intent of a paging load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoadType {
    /// Invalidate the cache and reload around the current anchor
    Refresh,
    /// Load the page before the first cached item
    Prepend,
    /// Load the page after the last cached item
    Append,
}

impl LoadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Prepend => "prepend",
            Self::Append => "append",
        }
    }
}

impl std::str::FromStr for LoadType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "refresh" => Ok(Self::Refresh),
            "prepend" => Ok(Self::Prepend),
            "append" => Ok(Self::Append),
            _ => Err(anyhow::anyhow!("Invalid load type: {}", s)),
        }
    }
}

/// Observable state of one load type on a pager.
///
/// The error arm carries a rendered cause rather than the source error so
/// the state stays `Clone` across a broadcast channel; the typed cause is
/// available on the load result itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoading,
    Loading,
    Success { end_of_pagination: bool },
    Error(String),
}

impl LoadState {
    /// Whether the edge this state belongs to has reported end of pagination.
    #[must_use]
    pub const fn end_of_pagination(&self) -> bool {
        matches!(self, Self::Success { end_of_pagination: true })
    }
}
