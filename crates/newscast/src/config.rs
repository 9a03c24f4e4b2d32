//! CLI configuration, a thin layer over `newscast_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--profile`, `--api-url`, `--timeout`).

use std::time::Duration;

use newscast_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use newscast_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `DashboardConfig` for this invocation.
///
/// Flags win over the profile; the profile wins over global defaults.
pub fn dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = newscast_config::load_config()?;
    let (name, profile) = newscast_config::resolve_profile(&cfg, global.profile.as_deref())?;

    let mut config = newscast_config::profile_to_dashboard_config(&profile, &cfg.defaults)?;
    if let Some(url) = global.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        config.base_url = newscast_config::parse_api_url(url)?;
    }
    if let Some(secs) = global.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    tracing::debug!(profile = %name, api_url = %config.base_url, "resolved dashboard config");
    Ok(config)
}
