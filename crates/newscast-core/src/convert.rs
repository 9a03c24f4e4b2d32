// ── API-to-domain type conversions ──
//
// Bridges `newscast_api::types` response types into `crate::model`.
// Quarantine counts and unmodeled wire fields stop here.

use newscast_api::types::{
    BroadcastLogResponse, BroadcastRequestBody, BroadcastResponse, FavoriteResponse,
    NewsItemResponse, NewsPageResponse, RefreshResponse,
};

use crate::model::{
    BroadcastLogEntry, BroadcastOutcome, BroadcastRequest, Favorite, NewsItem, NewsPage,
    RefreshSummary,
};

/// Remote status strings that mean the delivery did not happen.
const FAILED_STATUSES: [&str; 2] = ["failed", "error"];

impl From<NewsItemResponse> for NewsItem {
    fn from(r: NewsItemResponse) -> Self {
        Self {
            id: r.id,
            title: r.title,
            summary: r.summary,
            published_at: r.published_at,
            source_id: r.source_id,
            url: r.url,
            author: r.author,
            retrieved_at: r.retrieved_at,
        }
    }
}

impl From<NewsPageResponse> for NewsPage {
    fn from(r: NewsPageResponse) -> Self {
        Self {
            items: r.items.into_iter().map(NewsItem::from).collect(),
            total: r.total,
            page: r.page,
            limit: r.limit,
        }
    }
}

impl From<RefreshResponse> for RefreshSummary {
    fn from(r: RefreshResponse) -> Self {
        Self {
            inserted: r.inserted,
            duplicates: r.duplicates,
            message: r.message,
        }
    }
}

impl From<FavoriteResponse> for Favorite {
    fn from(r: FavoriteResponse) -> Self {
        Self {
            id: r.id,
            news_item: r.news_item.into(),
            created_at: r.created_at,
        }
    }
}

impl From<&BroadcastRequest> for BroadcastRequestBody {
    fn from(req: &BroadcastRequest) -> Self {
        Self {
            favorite_id: req.favorite_id,
            platform: req.platform.to_string(),
            message_override: req.message_override.clone(),
        }
    }
}

impl From<BroadcastResponse> for BroadcastOutcome {
    fn from(r: BroadcastResponse) -> Self {
        let delivered = r.delivered.unwrap_or_else(|| {
            r.status.as_deref().is_none_or(|status| {
                !FAILED_STATUSES
                    .iter()
                    .any(|failed| status.eq_ignore_ascii_case(failed))
            })
        });
        Self {
            delivered,
            detail: r.detail.or(r.message_preview),
            log_id: r.id,
            timestamp: r.timestamp,
        }
    }
}

impl From<BroadcastLogResponse> for BroadcastLogEntry {
    fn from(r: BroadcastLogResponse) -> Self {
        Self {
            id: r.id,
            favorite_id: r.favorite_id,
            platform: r.platform,
            status: r.status,
            message_preview: r.message_preview,
            timestamp: r.timestamp,
            extra: r.extra,
        }
    }
}
