// ── Cache store ──
//
// Per-key cached remote resources with single-flight loading and
// push-based change notification.

mod cache_store;
mod entry;
mod key;
mod resource;

pub use cache_store::CacheStore;
pub use entry::{CacheEntry, CacheStatus};
pub use key::CacheKey;
pub use resource::ResourceCache;
