//! Wire types for the newscast REST API (`/api/v1/`).
//!
//! Field names match the JSON bodies as emitted by the remote service
//! (snake_case). Timestamps are decoded leniently, see [`crate::decode`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::lenient_timestamp;

// ── News ─────────────────────────────────────────────────────────────

/// A single news item, element of `GET /news` and embedded in favorites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItemResponse {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    pub source_id: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub retrieved_at: Option<DateTime<Utc>>,
}

/// Paginated news feed from `GET /news?page={p}&limit={n}`.
///
/// Items that fail to decode are quarantined: dropped from `items` and
/// counted in `rejected`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsPageResponse {
    pub items: Vec<NewsItemResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: Option<u32>,
    pub rejected: usize,
}

/// Raw envelope of the news feed before per-item decoding.
#[derive(Debug, Deserialize)]
pub(crate) struct RawNewsPage {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub total: u64,
    pub page: u32,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Ingestion summary from `POST /news/refresh`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub inserted: Option<u64>,
    #[serde(default)]
    pub duplicates: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Favorites ────────────────────────────────────────────────────────

/// A favorited news item with its embedded snapshot, as returned by `GET /favorites`
/// and `POST /favorites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub id: i64,
    pub news_item: NewsItemResponse,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /favorites`.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteCreate {
    pub news_item_id: i64,
}

/// Generic acknowledgement body (`{"message": "..."}` or empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Broadcast ────────────────────────────────────────────────────────

/// Body of `POST /broadcast`.
///
/// `message_override` is always serialized; absent is `null`, never `""`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastRequestBody {
    pub favorite_id: i64,
    /// One of: `email`, `whatsapp`, `linkedin`, `blog`, `newsletter`.
    pub platform: String,
    pub message_override: Option<String>,
}

/// Broadcast result from `POST /broadcast`.
///
/// Accepts both the `{ delivered, detail }` contract and the log-shaped
/// reply `{ id, status, message_preview, timestamp }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    #[serde(default)]
    pub delivered: Option<bool>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message_preview: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Broadcast history entry from `GET /broadcast/logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastLogResponse {
    pub id: i64,
    pub favorite_id: i64,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message_preview: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
