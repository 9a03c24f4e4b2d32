// ── Domain model ──
//
// Canonical types handed to consumers. Wire types from newscast-api are
// converted in `crate::convert` and never leak past this crate.

pub mod broadcast;
pub mod favorite;
pub mod news;

pub use broadcast::{BroadcastLogEntry, BroadcastOutcome, BroadcastRequest, Platform};
pub use favorite::Favorite;
pub use news::{NewsItem, NewsPage, RefreshSummary};
