//! Broadcast command handlers.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use newscast_core::{BroadcastLogEntry, BroadcastOutcome, Dashboard, Platform};

use crate::cli::{BroadcastArgs, BroadcastCommand, GlobalOpts, PlatformArg};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Email => Self::Email,
            PlatformArg::Whatsapp => Self::Whatsapp,
            PlatformArg::Linkedin => Self::Linkedin,
            PlatformArg::Blog => Self::Blog,
            PlatformArg::Newsletter => Self::Newsletter,
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Favorite")]
    favorite_id: i64,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Sent")]
    sent: String,
}

impl From<&BroadcastLogEntry> for LogRow {
    fn from(log: &BroadcastLogEntry) -> Self {
        Self {
            id: log.id,
            favorite_id: log.favorite_id,
            platform: output::or_dash(log.platform.as_deref()),
            status: output::or_dash(log.status.as_deref()),
            message: output::truncate(&output::or_dash(log.message_preview.as_deref()), 48),
            sent: output::format_time(log.timestamp.as_ref()),
        }
    }
}

#[derive(Serialize)]
struct PlatformInfo {
    name: Platform,
    label: &'static str,
}

#[derive(Tabled)]
struct PlatformRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Channel")]
    label: &'static str,
}

fn outcome_detail(outcome: &BroadcastOutcome) -> String {
    let mut out = String::from("Broadcast delivered");
    if let Some(detail) = outcome.detail.as_deref() {
        out.push_str(&format!("\n  Detail: {detail}"));
    }
    if let Some(id) = outcome.log_id {
        out.push_str(&format!("\n  Log:    {id}"));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: BroadcastArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BroadcastCommand::Send {
            favorite_id,
            platform,
            message,
        } => {
            let platform = Platform::from(platform);
            let flow = dashboard.broadcast_flow(favorite_id);
            flow.select_platform(platform)?;
            flow.set_message(message)?;

            tracing::debug!(favorite_id, %platform, "submitting broadcast");
            let outcome = flow.submit().await?;
            tracing::debug!(phase = ?flow.phase(), attempts = flow.snapshot().attempts, "broadcast settled");

            let out = output::render_single(global.output, &outcome, outcome_detail, |o| {
                o.log_id.map(|id| id.to_string()).unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            output::notice(
                &format!("Sent favorite {favorite_id} via {}", platform.label()),
                global.quiet,
            );
            Ok(())
        }

        BroadcastCommand::Logs => {
            let entry = dashboard.broadcast_logs().await;
            let logs = util::loaded(&entry, dashboard)?;
            let out = output::render_list(
                global.output,
                logs.as_slice(),
                |l| LogRow::from(l),
                |l| l.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if logs.is_empty() {
                output::notice("No broadcasts yet", global.quiet);
            }
            Ok(())
        }

        BroadcastCommand::Platforms => {
            let platforms: Vec<PlatformInfo> = Platform::iter()
                .map(|p| PlatformInfo {
                    name: p,
                    label: p.label(),
                })
                .collect();
            let out = output::render_list(
                global.output,
                &platforms,
                |p| PlatformRow {
                    name: p.name.to_string(),
                    label: p.label,
                },
                |p| p.name.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
