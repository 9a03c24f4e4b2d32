//! Command dispatch: bridges CLI args -> dashboard operations -> output.

pub mod broadcast;
pub mod config_cmd;
pub mod favorites;
pub mod news;
pub mod util;

use newscast_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::News(args) => news::handle(dashboard, args, global).await,
        Command::Favorites(args) => favorites::handle(dashboard, args, global).await,
        Command::Broadcast(args) => broadcast::handle(dashboard, args, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
