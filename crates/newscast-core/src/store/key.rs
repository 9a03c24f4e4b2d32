use std::fmt;

use serde::Serialize;

/// Identity of a cached remote resource.
///
/// Two requests for the same key share one cache entry and at most one
/// in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum CacheKey {
    NewsPage { page: u32, limit: u32 },
    Favorites,
    BroadcastLogs,
}

impl CacheKey {
    pub fn news_page(page: u32, limit: u32) -> Self {
        Self::NewsPage { page, limit }
    }

    pub fn is_news_page(&self) -> bool {
        matches!(self, Self::NewsPage { .. })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewsPage { page, limit } => write!(f, "news:page={page}&limit={limit}"),
            Self::Favorites => f.write_str("favorites"),
            Self::BroadcastLogs => f.write_str("broadcast:logs"),
        }
    }
}
