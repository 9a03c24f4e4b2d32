// ── Core error types ──
//
// User-facing errors from newscast-core. Consumers never see reqwest
// errors or JSON parse failures directly; the `From<newscast_api::Error>`
// impl translates transport-layer errors into domain variants.

use serde::Serialize;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    #[error("Cannot reach news service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out: {reason}")]
    Timeout { reason: String },

    #[error("Transport error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        /// HTTP status code, absent when no response arrived.
        status: Option<u16>,
        message: String,
    },

    // ── Remote-reported conditions ───────────────────────────────────
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Broadcast was not delivered: {detail}")]
    NotDelivered { detail: String },

    #[error("Malformed payload from news service: {message}")]
    MalformedPayload { message: String },

    /// A cached resource could not be loaded and has no data to fall back on.
    #[error("{key} unavailable: {cause}")]
    ResourceUnavailable { key: String, cause: ErrorInfo },

    // ── Client-side validation ───────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("A broadcast submission is already in flight")]
    SubmissionInFlight,

    // ── Configuration / internal ─────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionFailed { .. } => ErrorKind::Connection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotDelivered { .. } => ErrorKind::NotDelivered,
            Self::MalformedPayload { .. } => ErrorKind::Malformed,
            Self::ResourceUnavailable { cause, .. } => cause.kind,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::SubmissionInFlight => ErrorKind::InFlight,
            Self::Config { .. } => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::ResourceUnavailable { cause, .. } => cause.status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Name the entity a 404 was about. Other errors pass through.
    pub fn for_entity(self, entity_type: &str, identifier: impl ToString) -> Self {
        match self {
            Self::NotFound { .. } => Self::NotFound {
                entity_type: entity_type.into(),
                identifier: identifier.to_string(),
            },
            other => other,
        }
    }
}

// ── Retained error snapshots ─────────────────────────────────────────

/// Coarse classification of a failure, stable across error layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Connection,
    Timeout,
    Transport,
    Conflict,
    NotFound,
    NotDelivered,
    Malformed,
    Validation,
    InFlight,
    Abandoned,
    Config,
    Internal,
}

/// A cloneable snapshot of a failure.
///
/// Cache entries and broadcast flows keep one of these for display after
/// the originating `CoreError` has been returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ErrorInfo {
    pub(crate) fn abandoned(what: &str) -> Self {
        Self {
            kind: ErrorKind::Abandoned,
            status: None,
            message: format!("{what} was abandoned before completion"),
        }
    }
}

impl From<&CoreError> for ErrorInfo {
    fn from(err: &CoreError) -> Self {
        Self {
            kind: err.kind(),
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<newscast_api::Error> for CoreError {
    fn from(err: newscast_api::Error) -> Self {
        match err {
            newscast_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        reason: e.to_string(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Transport {
                        status: e.status().map(|s| s.as_u16()),
                        message: e.to_string(),
                    }
                }
            }
            newscast_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            newscast_api::Error::NotFound { message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            newscast_api::Error::Conflict { message } => CoreError::Conflict { message },
            newscast_api::Error::Rejected { field, message } => CoreError::Validation {
                field,
                reason: message,
            },
            newscast_api::Error::Status { status, message } => CoreError::Transport {
                status: Some(status),
                message,
            },
            newscast_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedPayload { message }
            }
        }
    }
}
