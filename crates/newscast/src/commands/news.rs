//! News feed command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use newscast_core::{Command as CoreCommand, CommandResult, Dashboard, NewsItem, RefreshSummary};

use crate::cli::{GlobalOpts, NewsArgs, NewsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NewsRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "★")]
    favorite: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Source")]
    source: i64,
    #[tabled(rename = "Published")]
    published: String,
}

impl NewsRow {
    fn new(item: &NewsItem, favorited: Option<bool>) -> Self {
        Self {
            id: item.id,
            favorite: if favorited == Some(true) { "★" } else { "" },
            title: output::truncate(&item.title, 72),
            source: item.source_id,
            published: output::format_time(item.published_at.as_ref()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: NewsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NewsCommand::List { page, limit } => {
            let limit = limit.unwrap_or(dashboard.config().page_size);

            // Both reads go out together; the favorites set only marks rows.
            let (news, favorites) = tokio::join!(
                dashboard.news_page_with_limit(page, limit),
                dashboard.favorites(),
            );
            let news = util::loaded(&news, dashboard)?;
            if let Some(err) = favorites.error.as_ref() {
                tracing::warn!(error = %err, "favorites unavailable; rows left unmarked");
            }

            let out = output::render_list(
                global.output,
                news.items.as_slice(),
                |item| NewsRow::new(item, dashboard.is_favorited(item.id)),
                |item| item.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);

            if news.is_empty() {
                output::notice("No news on this page", global.quiet);
            } else {
                output::notice(
                    &format!(
                        "Page {} of {} ({} items)",
                        news.page,
                        news.page_count(limit),
                        news.total
                    ),
                    global.quiet,
                );
            }
            Ok(())
        }

        NewsCommand::Refresh => {
            let CommandResult::Refreshed { summary } =
                dashboard.execute(CoreCommand::RefreshNews).await?
            else {
                return Err(CliError::Internal("unexpected refresh result".into()));
            };
            let out = output::render_single(global.output, &summary, refresh_detail, |s| {
                s.inserted.unwrap_or_default().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn refresh_detail(summary: &RefreshSummary) -> String {
    let mut out = String::from("Refresh complete");
    if let Some(inserted) = summary.inserted {
        let _ = write!(out, "\n  Inserted:   {inserted}");
    }
    if let Some(duplicates) = summary.duplicates {
        let _ = write!(out, "\n  Duplicates: {duplicates}");
    }
    if let Some(message) = summary.message.as_deref() {
        let _ = write!(out, "\n  {message}");
    }
    out
}
