// ── Single-flight resource cache ──
//
// One `watch` channel per key holds the current `CacheEntry`. Loading is
// claimed with `send_if_modified`, so exactly one caller runs the loader
// while the others wait for the entry to leave `Loading`.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{CacheEntry, CacheKey, CacheStatus};
use crate::error::{CoreError, ErrorInfo};
use crate::stream::EntryStream;

type Slot<T> = Arc<watch::Sender<CacheEntry<T>>>;

/// Cache for one resource kind, keyed by [`CacheKey`].
pub struct ResourceCache<T: Send + Sync + 'static> {
    entries: DashMap<CacheKey, Slot<T>>,
    /// Resource name used in log output.
    kind: &'static str,
}

impl<T: Send + Sync + 'static> ResourceCache<T> {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            entries: DashMap::new(),
            kind,
        }
    }

    fn slot(&self, key: CacheKey) -> Slot<T> {
        let slot = self
            .entries
            .entry(key)
            .or_insert_with(|| Arc::new(watch::channel(CacheEntry::idle(key)).0));
        Arc::clone(slot.value())
    }

    /// Return the entry for `key`, loading it first if it is absent or
    /// invalidated.
    ///
    /// At most one `loader` runs per key at a time. Callers arriving while
    /// a load is in flight wait for it instead of starting their own. Load
    /// failures are recorded on the entry, not returned.
    pub async fn get<F, Fut>(&self, key: CacheKey, loader: F) -> CacheEntry<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let slot = self.slot(key);

        loop {
            let mut previous = None;
            let claimed = slot.send_if_modified(|entry| {
                if !entry.needs_load() {
                    return false;
                }
                previous = Some(entry.clone());
                entry.status = CacheStatus::Loading;
                entry.invalidated = false;
                true
            });

            if claimed {
                return self.run_load(&slot, key, previous, loader).await;
            }

            let current = slot.borrow().clone();
            if !current.is_loading() {
                return current;
            }

            debug!(kind = self.kind, %key, "awaiting in-flight load");
            let mut rx = slot.subscribe();
            let settled = match rx.wait_for(|entry| !entry.is_loading()).await {
                Ok(entry) => entry.clone(),
                Err(_) => return slot.borrow().clone(),
            };
            // Invalidated here means the load was abandoned or raced an
            // invalidation; either way this caller fetches again.
            if !settled.invalidated {
                return settled;
            }
        }
    }

    async fn run_load<F, Fut>(
        &self,
        slot: &Slot<T>,
        key: CacheKey,
        previous: Option<CacheEntry<T>>,
        loader: F,
    ) -> CacheEntry<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        debug!(kind = self.kind, %key, "loading");
        let mut guard = LoadGuard {
            slot: slot.as_ref(),
            previous,
            kind: self.kind,
        };

        let result = loader().await;
        guard.disarm();

        match result {
            Ok(value) => slot.send_modify(|entry| {
                entry.data = Some(Arc::new(value));
                entry.status = CacheStatus::Ready;
                entry.error = None;
            }),
            Err(err) => {
                warn!(kind = self.kind, %key, error = %err, "load failed");
                let info = ErrorInfo::from(&err);
                slot.send_modify(|entry| {
                    entry.status = CacheStatus::Error;
                    entry.error = Some(info);
                });
            }
        }
        slot.borrow().clone()
    }

    /// Current entry for `key`, without loading.
    pub fn peek(&self, key: CacheKey) -> Option<CacheEntry<T>> {
        self.entries.get(&key).map(|slot| slot.borrow().clone())
    }

    /// Mark `key` for refetch on the next `get`. Data is kept.
    ///
    /// Idempotent; unknown keys are ignored.
    pub fn invalidate(&self, key: CacheKey) -> bool {
        let Some(slot) = self.entries.get(&key).map(|s| Arc::clone(s.value())) else {
            return false;
        };
        let changed = slot.send_if_modified(|entry| {
            if entry.invalidated {
                return false;
            }
            entry.invalidated = true;
            true
        });
        if changed {
            debug!(kind = self.kind, %key, "invalidated");
        }
        true
    }

    /// Invalidate every key matching `predicate`. Returns how many matched.
    pub fn invalidate_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&CacheKey) -> bool,
    {
        let matching: Vec<CacheKey> = self
            .entries
            .iter()
            .map(|r| *r.key())
            .filter(|k| predicate(k))
            .collect();
        for key in &matching {
            self.invalidate(*key);
        }
        matching.len()
    }

    /// Watch `key` for changes. Creates an idle entry if none exists yet.
    pub fn subscribe(&self, key: CacheKey) -> EntryStream<T> {
        EntryStream::new(self.slot(key).subscribe())
    }

    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.iter().map(|r| *r.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Cancellation ─────────────────────────────────────────────────────

/// Restores the pre-load entry, marked invalidated, if the loading future
/// is dropped before it commits.
struct LoadGuard<'a, T> {
    slot: &'a watch::Sender<CacheEntry<T>>,
    previous: Option<CacheEntry<T>>,
    kind: &'static str,
}

impl<T> LoadGuard<'_, T> {
    fn disarm(&mut self) {
        self.previous = None;
    }
}

impl<T> Drop for LoadGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(mut previous) = self.previous.take() {
            debug!(kind = self.kind, key = %previous.key, "load abandoned");
            previous.invalidated = true;
            self.slot.send_replace(previous);
        }
    }
}
