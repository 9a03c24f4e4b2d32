// ── Reactive entry streams ──
//
// Subscription types for consuming cache entry changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::CacheEntry;

/// A subscription to one cache entry.
///
/// Provides both point-in-time access and change notification via
/// [`changed`](Self::changed) or by converting into a `Stream`.
pub struct EntryStream<T: Send + Sync + 'static> {
    current: CacheEntry<T>,
    receiver: watch::Receiver<CacheEntry<T>>,
}

impl<T: Send + Sync + 'static> EntryStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<CacheEntry<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The entry as of creation or the last `changed()`.
    pub fn current(&self) -> &CacheEntry<T> {
        &self.current
    }

    /// The latest entry (may have changed since creation).
    pub fn latest(&self) -> CacheEntry<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the store is dropped.
    pub async fn changed(&mut self) -> Option<CacheEntry<T>> {
        self.receiver.changed().await.ok()?;
        let entry = self.receiver.borrow_and_update().clone();
        self.current = entry.clone();
        Some(entry)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> EntryWatchStream<T> {
        EntryWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current entry first, then each subsequent change.
pub struct EntryWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<CacheEntry<T>>,
}

impl<T: Send + Sync + 'static> Stream for EntryWatchStream<T> {
    type Item = CacheEntry<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
