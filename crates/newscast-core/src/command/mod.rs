// ── Command API ──
//
// Every mutation of remote state is expressible as a `Command`. The
// `Coordinator` routes each variant to the gateway and applies the
// matching cache invalidation.

use serde::Serialize;

use crate::model::{BroadcastOutcome, BroadcastRequest, Favorite, RefreshSummary};

/// All write operations against the news service.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Favorites ────────────────────────────────────────────────────
    AddFavorite { news_item_id: i64 },
    RemoveFavorite { favorite_id: i64 },
    ToggleFavorite(ToggleTarget),

    // ── News ─────────────────────────────────────────────────────────
    RefreshNews,

    // ── Broadcast ────────────────────────────────────────────────────
    Broadcast(BroadcastRequest),
}

/// What a favorite toggle acts on.
#[derive(Debug, Clone)]
pub enum ToggleTarget {
    /// Decided against the cached favorites set.
    NewsItem(i64),
    /// Always a removal.
    Favorite(Favorite),
}

/// Result of a successful removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveOutcome {
    Removed,
    /// The remote no longer had the favorite.
    AlreadyRemoved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added { favorite: Favorite },
    Removed { favorite_id: i64, outcome: RemoveOutcome },
}

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandResult {
    FavoriteAdded { favorite: Favorite },
    FavoriteRemoved { favorite_id: i64, outcome: RemoveOutcome },
    Toggled { outcome: ToggleOutcome },
    Refreshed { summary: RefreshSummary },
    Broadcast { outcome: BroadcastOutcome },
}
