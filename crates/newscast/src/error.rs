//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use newscast_config::ConfigError;
use newscast_core::{CoreError, ErrorInfo, ErrorKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the news service at {url}")]
    #[diagnostic(
        code(newscast::connection_failed),
        help(
            "Check that the service is running and reachable ({reason}).\n\
             Override the address with --api-url or NEWSCAST_API_URL."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(newscast::timeout),
        help("Increase the timeout with --timeout or check service responsiveness.\n{reason}")
    )]
    Timeout { reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(newscast::not_found),
        help("Run: newscast {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(newscast::conflict),
        help("Run: newscast favorites list to see current favorites")
    )]
    Conflict { message: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("News service error: {message}")]
    #[diagnostic(code(newscast::api_error))]
    Api { message: String },

    #[error("Broadcast was not delivered: {detail}")]
    #[diagnostic(
        code(newscast::not_delivered),
        help("See: newscast broadcast logs")
    )]
    NotDelivered { detail: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(newscast::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(newscast::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: newscast config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(newscast::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(newscast::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(newscast::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(newscast::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Rebuild an error from the snapshot a cache entry retained.
    pub fn from_cause(cause: ErrorInfo, url: &str) -> Self {
        match cause.kind {
            ErrorKind::Connection => Self::ConnectionFailed {
                url: url.into(),
                reason: cause.message,
            },
            ErrorKind::Timeout => Self::Timeout {
                reason: cause.message,
            },
            _ => Self::Api {
                message: cause.message,
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },

            CoreError::Timeout { reason } => Self::Timeout { reason },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: match entity_type.as_str() {
                    "favorite" => "favorites list",
                    _ => "news list",
                }
                .into(),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Conflict { message } => Self::Conflict { message },

            CoreError::NotDelivered { detail } => Self::NotDelivered { detail },

            CoreError::Validation { field, reason } => Self::Validation { field, reason },

            CoreError::SubmissionInFlight => Self::Validation {
                field: "broadcast".into(),
                reason: "a submission is already in flight".into(),
            },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::ResourceUnavailable { cause, .. } => {
                Self::from_cause(cause, "the configured API URL")
            }

            err @ (CoreError::Transport { .. } | CoreError::MalformedPayload { .. }) => Self::Api {
                message: err.to_string(),
            },

            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name } => {
                let cfg = newscast_config::load_config_or_default();
                let mut names: Vec<_> = cfg.profiles.into_keys().collect();
                names.sort();
                Self::ProfileNotFound {
                    name,
                    available: if names.is_empty() {
                        "(none)".into()
                    } else {
                        names.join(", ")
                    },
                }
            }
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
