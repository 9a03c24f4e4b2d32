// ── Cache loaders ──
//
// Gateway reads converted into domain types. Passed to the cache store as
// loaders by `Dashboard` and `Coordinator`.

use newscast_api::NewsClient;
use tracing::warn;

use crate::error::CoreError;
use crate::model::{BroadcastLogEntry, Favorite, NewsPage};

pub(crate) async fn news_page(
    client: &NewsClient,
    page: u32,
    limit: u32,
) -> Result<NewsPage, CoreError> {
    let response = client.list_news(page, limit).await?;
    if response.rejected > 0 {
        warn!(
            page,
            rejected = response.rejected,
            "news page contained malformed items"
        );
    }
    Ok(response.into())
}

pub(crate) async fn favorites(client: &NewsClient) -> Result<Vec<Favorite>, CoreError> {
    let favorites = client.list_favorites().await?;
    Ok(favorites.into_iter().map(Favorite::from).collect())
}

pub(crate) async fn broadcast_logs(
    client: &NewsClient,
) -> Result<Vec<BroadcastLogEntry>, CoreError> {
    let logs = client.list_broadcast_logs().await?;
    Ok(logs.into_iter().map(BroadcastLogEntry::from).collect())
}
