// ── Dashboard facade ──
//
// Wires the gateway, cache store and coordinator together. Consumers read
// through the cached accessors and mutate through `execute` or the
// coordinator; nothing else writes to the store.

use std::sync::Arc;

use newscast_api::{NewsClient, TransportConfig};

use crate::command::{Command, CommandResult};
use crate::config::DashboardConfig;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::fetch;
use crate::flow::BroadcastFlow;
use crate::model::{BroadcastLogEntry, Favorite, NewsPage};
use crate::scope::ViewScope;
use crate::store::{CacheEntry, CacheKey, CacheStore};
use crate::stream::EntryStream;

/// The main entry point for consumers.
///
/// Cheaply cloneable; clones share one cache store.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    store: Arc<CacheStore>,
    coordinator: Coordinator,
}

impl Dashboard {
    /// Build a dashboard with its own HTTP client and an empty cache.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = NewsClient::new(config.base_url.as_str(), &transport)?;
        Ok(Self::from_parts(config, client, Arc::new(CacheStore::new())))
    }

    /// Assemble from an existing client and store.
    pub fn from_parts(config: DashboardConfig, client: NewsClient, store: Arc<CacheStore>) -> Self {
        let coordinator = Coordinator::new(client, Arc::clone(&store));
        Self {
            inner: Arc::new(DashboardInner {
                config,
                store,
                coordinator,
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.inner.store
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.inner.coordinator
    }

    fn client(&self) -> &NewsClient {
        self.inner.coordinator.client()
    }

    // ── Cached reads ─────────────────────────────────────────────────

    /// News page `page` at the configured page size.
    pub async fn news_page(&self, page: u32) -> CacheEntry<NewsPage> {
        self.news_page_with_limit(page, self.inner.config.page_size)
            .await
    }

    pub async fn news_page_with_limit(&self, page: u32, limit: u32) -> CacheEntry<NewsPage> {
        let page = page.max(1);
        let limit = limit.max(1);
        self.store()
            .news_pages()
            .get(CacheKey::news_page(page, limit), || {
                fetch::news_page(self.client(), page, limit)
            })
            .await
    }

    pub async fn favorites(&self) -> CacheEntry<Vec<Favorite>> {
        self.store()
            .favorites()
            .get(CacheKey::Favorites, || fetch::favorites(self.client()))
            .await
    }

    pub async fn broadcast_logs(&self) -> CacheEntry<Vec<BroadcastLogEntry>> {
        self.store()
            .broadcast_logs()
            .get(CacheKey::BroadcastLogs, || {
                fetch::broadcast_logs(self.client())
            })
            .await
    }

    /// Whether `news_item_id` is favorited, per the cached favorites set.
    pub fn is_favorited(&self, news_item_id: i64) -> Option<bool> {
        let entry = self.store().favorites().peek(CacheKey::Favorites)?;
        let favorites = entry.data?;
        Some(favorites.iter().any(|f| f.news_item_id() == news_item_id))
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_favorites(&self) -> EntryStream<Vec<Favorite>> {
        self.store().favorites().subscribe(CacheKey::Favorites)
    }

    pub fn subscribe_broadcast_logs(&self) -> EntryStream<Vec<BroadcastLogEntry>> {
        self.store().broadcast_logs().subscribe(CacheKey::BroadcastLogs)
    }

    pub fn subscribe_news_page(&self, page: u32, limit: u32) -> EntryStream<NewsPage> {
        self.store()
            .news_pages()
            .subscribe(CacheKey::news_page(page.max(1), limit.max(1)))
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        self.inner.coordinator.execute(command).await
    }

    /// A fresh broadcast flow for one favorite.
    pub fn broadcast_flow(&self, favorite_id: i64) -> BroadcastFlow {
        BroadcastFlow::new(self.inner.coordinator.clone(), favorite_id)
    }

    /// A new top-level view scope.
    pub fn scope(&self) -> ViewScope {
        ViewScope::new()
    }
}
