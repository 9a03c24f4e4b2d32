// ── Central cache store ──
//
// Owns one `ResourceCache` per resource kind. Shared by every view through
// `Dashboard`; only the store's own loads and the `Coordinator` write to it.

use tracing::debug;

use super::{CacheKey, ResourceCache};
use crate::model::{BroadcastLogEntry, Favorite, NewsPage};

/// Injectable cache of remote resources.
///
/// No global instance exists; construct one with [`CacheStore::new`] and
/// share it (the `Dashboard` holds it in an `Arc`).
pub struct CacheStore {
    news_pages: ResourceCache<NewsPage>,
    favorites: ResourceCache<Vec<Favorite>>,
    broadcast_logs: ResourceCache<Vec<BroadcastLogEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self {
            news_pages: ResourceCache::new("news"),
            favorites: ResourceCache::new("favorites"),
            broadcast_logs: ResourceCache::new("broadcast_logs"),
        }
    }

    // ── Typed accessors ──────────────────────────────────────────────

    pub fn news_pages(&self) -> &ResourceCache<NewsPage> {
        &self.news_pages
    }

    pub fn favorites(&self) -> &ResourceCache<Vec<Favorite>> {
        &self.favorites
    }

    pub fn broadcast_logs(&self) -> &ResourceCache<Vec<BroadcastLogEntry>> {
        &self.broadcast_logs
    }

    // ── Invalidation ─────────────────────────────────────────────────

    /// Mark `key` for refetch. Unknown keys are ignored.
    pub fn invalidate(&self, key: CacheKey) {
        let known = match key {
            CacheKey::NewsPage { .. } => self.news_pages.invalidate(key),
            CacheKey::Favorites => self.favorites.invalidate(key),
            CacheKey::BroadcastLogs => self.broadcast_logs.invalidate(key),
        };
        if !known {
            debug!(%key, "invalidate on unknown key ignored");
        }
    }

    /// Invalidate every cached key matching `predicate`, across all
    /// resource kinds. Returns how many keys matched.
    pub fn invalidate_all<P>(&self, predicate: P) -> usize
    where
        P: Fn(&CacheKey) -> bool,
    {
        self.news_pages.invalidate_where(&predicate)
            + self.favorites.invalidate_where(&predicate)
            + self.broadcast_logs.invalidate_where(&predicate)
    }

    /// Every key currently held, in no particular order.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys = self.news_pages.keys();
        keys.extend(self.favorites.keys());
        keys.extend(self.broadcast_logs.keys());
        keys
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
