//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Arc;

use newscast_core::{CacheEntry, Dashboard};

use crate::error::CliError;

/// Unwrap a cache entry for display, or turn its retained failure into a
/// CLI error.
///
/// A fresh CLI process has no stale data, so a failed load always
/// surfaces as an error here.
pub fn loaded<T>(entry: &CacheEntry<T>, dashboard: &Dashboard) -> Result<Arc<T>, CliError> {
    entry
        .to_result()
        .map_err(|cause| CliError::from_cause(cause, dashboard.config().base_url.as_str()))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}
