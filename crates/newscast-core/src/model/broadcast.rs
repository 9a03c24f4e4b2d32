use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// External channel a favorite can be broadcast to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    Email,
    Whatsapp,
    Linkedin,
    Blog,
    Newsletter,
}

impl Platform {
    /// Human-readable channel name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Whatsapp => "WhatsApp",
            Self::Linkedin => "LinkedIn",
            Self::Blog => "Blog",
            Self::Newsletter => "Newsletter",
        }
    }
}

/// A broadcast about to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastRequest {
    pub favorite_id: i64,
    pub platform: Platform,
    /// Custom text. `None` lets the remote compose the message.
    pub message_override: Option<String>,
}

impl BroadcastRequest {
    pub fn new(favorite_id: i64, platform: Platform) -> Self {
        Self {
            favorite_id,
            platform,
            message_override: None,
        }
    }

    /// Set the override; blank text counts as no override.
    #[must_use]
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message_override = normalize_message(message);
        self
    }
}

pub(crate) fn normalize_message(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Result of a broadcast accepted by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastOutcome {
    pub delivered: bool,
    pub detail: Option<String>,
    /// Identifier of the log row the remote recorded, when reported.
    pub log_id: Option<i64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Row of the broadcast history. Opaque beyond display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastLogEntry {
    pub id: i64,
    pub favorite_id: i64,
    pub platform: Option<String>,
    pub status: Option<String>,
    pub message_preview: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
