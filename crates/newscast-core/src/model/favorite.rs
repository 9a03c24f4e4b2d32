use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NewsItem;

/// A favorited news item.
///
/// Carries its own snapshot of the item, so favorite views render without
/// consulting the news cache. Never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub news_item: NewsItem,
    pub created_at: Option<DateTime<Utc>>,
}

impl Favorite {
    pub fn news_item_id(&self) -> i64 {
        self.news_item.id
    }
}
