// ── Mutation coordinator ──
//
// Runs every remote mutation and decides which cache keys it invalidates.
// Mutations never write into the cache directly; they only mark entries
// stale so the next read refetches the remote's truth.

use std::sync::Arc;

use newscast_api::NewsClient;
use newscast_api::types::BroadcastRequestBody;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandResult, RemoveOutcome, ToggleOutcome, ToggleTarget};
use crate::error::CoreError;
use crate::fetch;
use crate::flow::BroadcastFlow;
use crate::model::{BroadcastOutcome, BroadcastRequest, Favorite, RefreshSummary};
use crate::store::{CacheKey, CacheStore};

/// Executes mutations against the news service and keeps the cache honest.
///
/// Cheap to clone: holds a `NewsClient` and a shared `CacheStore`.
#[derive(Clone)]
pub struct Coordinator {
    client: NewsClient,
    store: Arc<CacheStore>,
}

impl Coordinator {
    pub fn new(client: NewsClient, store: Arc<CacheStore>) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &NewsClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Route a command to its operation.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        match command {
            Command::AddFavorite { news_item_id } => {
                let favorite = self.add_favorite(news_item_id).await?;
                Ok(CommandResult::FavoriteAdded { favorite })
            }
            Command::RemoveFavorite { favorite_id } => {
                let outcome = self.remove_favorite(favorite_id).await?;
                Ok(CommandResult::FavoriteRemoved {
                    favorite_id,
                    outcome,
                })
            }
            Command::ToggleFavorite(target) => {
                let outcome = self.toggle_favorite(target).await?;
                Ok(CommandResult::Toggled { outcome })
            }
            Command::RefreshNews => {
                let summary = self.trigger_refresh().await?;
                Ok(CommandResult::Refreshed { summary })
            }
            Command::Broadcast(request) => {
                let outcome = self.dispatch_broadcast(request).await?;
                Ok(CommandResult::Broadcast { outcome })
            }
        }
    }

    // ── Favorites ────────────────────────────────────────────────────

    /// Mark a news item as favorite. A duplicate is a `Conflict`.
    pub async fn add_favorite(&self, news_item_id: i64) -> Result<Favorite, CoreError> {
        let favorite: Favorite = self
            .client
            .add_favorite(news_item_id)
            .await
            .map_err(|e| CoreError::from(e).for_entity("news item", news_item_id))?
            .into();
        info!(news_item_id, favorite_id = favorite.id, "favorite added");
        self.store.invalidate(CacheKey::Favorites);
        Ok(favorite)
    }

    /// Remove a favorite. A favorite the remote no longer has counts as
    /// removed; the favorites entry is invalidated either way.
    pub async fn remove_favorite(&self, favorite_id: i64) -> Result<RemoveOutcome, CoreError> {
        let outcome = match self.client.remove_favorite(favorite_id).await {
            Ok(_) => RemoveOutcome::Removed,
            Err(e) if e.is_not_found() => {
                warn!(favorite_id, "favorite already gone on remote");
                RemoveOutcome::AlreadyRemoved
            }
            Err(e) => return Err(e.into()),
        };
        info!(favorite_id, ?outcome, "favorite removed");
        self.store.invalidate(CacheKey::Favorites);
        Ok(outcome)
    }

    /// Flip the favorite state of a news item or a known favorite.
    ///
    /// For a news item the cached favorites set decides the direction; it
    /// is loaded first if absent or stale.
    pub async fn toggle_favorite(&self, target: ToggleTarget) -> Result<ToggleOutcome, CoreError> {
        let favorite_id = match target {
            ToggleTarget::Favorite(favorite) => favorite.id,
            ToggleTarget::NewsItem(news_item_id) => {
                match self.favorite_for(news_item_id).await? {
                    Some(id) => id,
                    None => {
                        let favorite = self.add_favorite(news_item_id).await?;
                        return Ok(ToggleOutcome::Added { favorite });
                    }
                }
            }
        };

        let outcome = self.remove_favorite(favorite_id).await?;
        Ok(ToggleOutcome::Removed {
            favorite_id,
            outcome,
        })
    }

    /// Id of the favorite wrapping `news_item_id`, per the cached set.
    async fn favorite_for(&self, news_item_id: i64) -> Result<Option<i64>, CoreError> {
        let entry = self
            .store
            .favorites()
            .get(CacheKey::Favorites, || fetch::favorites(&self.client))
            .await;

        // Stale data from a failed reload is still the last known truth.
        let favorites = entry.last_known()?;
        Ok(favorites
            .iter()
            .find(|f| f.news_item_id() == news_item_id)
            .map(|f| f.id))
    }

    // ── News ─────────────────────────────────────────────────────────

    /// Ask the remote to re-ingest news. Every cached news page is
    /// invalidated whether or not the call succeeds.
    pub async fn trigger_refresh(&self) -> Result<RefreshSummary, CoreError> {
        let result = self.client.refresh_news().await;
        let pages = self.store.invalidate_all(CacheKey::is_news_page);
        debug!(pages, "news pages invalidated after refresh");

        let summary: RefreshSummary = result?.into();
        info!(
            inserted = ?summary.inserted,
            duplicates = ?summary.duplicates,
            "news refresh completed"
        );
        Ok(summary)
    }

    // ── Broadcast ────────────────────────────────────────────────────

    /// Run a fresh broadcast flow for `request` to completion.
    pub async fn dispatch_broadcast(
        &self,
        request: BroadcastRequest,
    ) -> Result<BroadcastOutcome, CoreError> {
        let flow = BroadcastFlow::new(self.clone(), request.favorite_id);
        flow.select_platform(request.platform)?;
        flow.set_message(request.message_override)?;
        flow.submit().await
    }

    /// Send one broadcast. Invalidates the log whenever the remote
    /// accepted the request, delivered or not.
    pub(crate) async fn send_broadcast(
        &self,
        request: &BroadcastRequest,
    ) -> Result<BroadcastOutcome, CoreError> {
        let body = BroadcastRequestBody::from(request);
        let outcome: BroadcastOutcome = self
            .client
            .broadcast(&body)
            .await
            .map_err(|e| CoreError::from(e).for_entity("favorite", request.favorite_id))?
            .into();
        self.store.invalidate(CacheKey::BroadcastLogs);
        info!(
            favorite_id = request.favorite_id,
            platform = %request.platform,
            delivered = outcome.delivered,
            "broadcast accepted"
        );
        Ok(outcome)
    }
}
