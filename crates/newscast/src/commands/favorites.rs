//! Favorites command handlers.

use tabled::Tabled;

use newscast_core::{
    Command as CoreCommand, CommandResult, Dashboard, Favorite, RemoveOutcome, ToggleOutcome,
    ToggleTarget,
};

use crate::cli::{FavoritesArgs, FavoritesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FavoriteRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "News ID")]
    news_id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Saved")]
    saved: String,
}

impl From<&Favorite> for FavoriteRow {
    fn from(f: &Favorite) -> Self {
        Self {
            id: f.id,
            news_id: f.news_item_id(),
            title: output::truncate(&f.news_item.title, 72),
            saved: output::format_time(f.created_at.as_ref()),
        }
    }
}

fn favorite_detail(f: &Favorite) -> String {
    format!(
        "Favorite {}\n  News:  {} ({})\n  URL:   {}\n  Saved: {}",
        f.id,
        f.news_item.title,
        f.news_item_id(),
        output::or_dash(f.news_item.url.as_deref()),
        output::format_time(f.created_at.as_ref()),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: FavoritesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FavoritesCommand::List => {
            let entry = dashboard.favorites().await;
            let favorites = util::loaded(&entry, dashboard)?;
            let out = output::render_list(
                global.output,
                favorites.as_slice(),
                |f| FavoriteRow::from(f),
                |f| f.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if favorites.is_empty() {
                output::notice("No favorites yet", global.quiet);
            }
            Ok(())
        }

        FavoritesCommand::Add { news_id } => {
            let favorite = match dashboard
                .execute(CoreCommand::AddFavorite {
                    news_item_id: news_id,
                })
                .await?
            {
                CommandResult::FavoriteAdded { favorite } => favorite,
                other => return Err(unexpected(&other)),
            };
            print_favorite(&favorite, global)?;
            output::notice(&format!("Added news {news_id} to favorites"), global.quiet);
            Ok(())
        }

        FavoritesCommand::Remove { favorite_id } => {
            if !util::confirm(
                &format!("Remove favorite {favorite_id}?"),
                "favorites remove",
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = match dashboard
                .execute(CoreCommand::RemoveFavorite { favorite_id })
                .await?
            {
                CommandResult::FavoriteRemoved { outcome, .. } => outcome,
                other => return Err(unexpected(&other)),
            };
            output::notice(&removal_notice(favorite_id, outcome), global.quiet);
            Ok(())
        }

        FavoritesCommand::Toggle { news_id } => {
            let result = dashboard
                .execute(CoreCommand::ToggleFavorite(ToggleTarget::NewsItem(news_id)))
                .await?;
            let outcome = match result {
                CommandResult::Toggled { outcome } => outcome,
                other => return Err(unexpected(&other)),
            };
            match outcome {
                ToggleOutcome::Added { favorite } => {
                    print_favorite(&favorite, global)?;
                    output::notice(&format!("Added news {news_id} to favorites"), global.quiet);
                }
                ToggleOutcome::Removed {
                    favorite_id,
                    outcome,
                } => output::notice(&removal_notice(favorite_id, outcome), global.quiet),
            }
            Ok(())
        }
    }
}

fn print_favorite(favorite: &Favorite, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, favorite, favorite_detail, |f| {
        f.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn removal_notice(favorite_id: i64, outcome: RemoveOutcome) -> String {
    match outcome {
        RemoveOutcome::Removed => format!("Removed favorite {favorite_id}"),
        RemoveOutcome::AlreadyRemoved => format!("Favorite {favorite_id} was already removed"),
    }
}

fn unexpected(result: &CommandResult) -> CliError {
    CliError::Internal(format!("unexpected command result: {result:?}"))
}
