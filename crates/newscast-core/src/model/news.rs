use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news item. Read-only for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source_id: i64,
    pub url: Option<String>,
    pub author: Option<String>,
    pub retrieved_at: Option<DateTime<Utc>>,
}

/// One page of the news feed. An empty page is a valid value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    pub total: u64,
    pub page: u32,
    pub limit: Option<u32>,
}

impl NewsPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages implied by `total` and the page size, at least 1.
    pub fn page_count(&self, fallback_limit: u32) -> u64 {
        let limit = u64::from(self.limit.unwrap_or(fallback_limit).max(1));
        self.total.div_ceil(limit).max(1)
    }
}

/// Acknowledgement of a server-side re-ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub inserted: Option<u64>,
    pub duplicates: Option<u64>,
    pub message: Option<String>,
}
