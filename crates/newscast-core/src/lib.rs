//! Client-side synchronization layer for the newscast dashboard.
//!
//! This crate sits between the raw HTTP client (`newscast-api`) and a
//! consumer such as the CLI. It provides:
//!
//! - **[`Dashboard`]**: facade that owns the client, the cache store and
//!   the mutation coordinator.
//! - **[`CacheStore`]**: per-key cached resources with single-flight
//!   loading, invalidation and `watch`-based change streams.
//! - **[`Coordinator`]**: runs mutations and invalidates the keys they
//!   affect. Never writes optimistically.
//! - **[`BroadcastFlow`]**: state machine for one broadcast attempt, with
//!   an in-flight guard.
//! - **[`ViewScope`]**: discards results that arrive after a view closed.
//! - **Domain model** ([`model`]): canonical types converted from wire
//!   payloads.

pub mod command;
pub mod config;
pub mod convert;
pub mod coordinator;
pub mod dashboard;
pub mod error;
mod fetch;
pub mod flow;
pub mod model;
pub mod scope;
pub mod store;
pub mod stream;

// ── Primary re-exports ───────────────────────────────────────────────
pub use command::{Command, CommandResult, RemoveOutcome, ToggleOutcome, ToggleTarget};
pub use config::DashboardConfig;
pub use coordinator::Coordinator;
pub use dashboard::Dashboard;
pub use error::{CoreError, ErrorInfo, ErrorKind};
pub use flow::{BroadcastFlow, BroadcastPhase, BroadcastSnapshot};
pub use scope::ViewScope;
pub use store::{CacheEntry, CacheKey, CacheStatus, CacheStore};
pub use stream::{EntryStream, EntryWatchStream};

// ── Model re-exports ─────────────────────────────────────────────────
pub use model::{
    BroadcastLogEntry, BroadcastOutcome, BroadcastRequest, Favorite, NewsItem, NewsPage, Platform,
    RefreshSummary,
};
