// ── Runtime dashboard configuration ──
//
// Describes *where* the news service lives and how pages are sized.
// Never touches disk: the CLI builds a `DashboardConfig` (usually via
// newscast-config) and hands it in.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable overriding the base URL.
pub const API_URL_ENV: &str = "NEWSCAST_API_URL";

pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for talking to one news service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Versioned API root, e.g. `http://localhost:8000/api/v1`.
    pub base_url: Url,
    /// Transport-level request timeout.
    pub timeout: Duration,
    /// Items requested per news page.
    pub page_size: u32,
}

impl DashboardConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Parse `raw` as the base URL, keeping other settings at their defaults.
    pub fn from_url(raw: &str) -> Result<Self, CoreError> {
        let base_url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid API URL {raw:?}: {e}"),
        })?;
        Ok(Self::new(base_url))
    }

    /// `NEWSCAST_API_URL` if set, else [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self, CoreError> {
        match std::env::var(API_URL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Self::from_url(raw.trim()),
            _ => Self::from_url(DEFAULT_API_URL),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}
