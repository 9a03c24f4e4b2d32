// ── View scopes ──
//
// Network calls are never cancelled. A view that goes away closes its
// scope instead, and results arriving afterwards are discarded.

use std::future::Future;

use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::trace;

/// Lifetime of a consumer view.
///
/// Clones share the same lifetime; [`child`](Self::child) scopes close with
/// their parent.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope that closes when this one does, or on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the scope is closed.
    pub async fn closed(&self) {
        self.token.cancelled().await;
    }

    /// Close the scope when the returned guard drops.
    pub fn close_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Await `fut` to completion; yield its output only if the scope is
    /// still open when it arrives.
    ///
    /// The future is not interrupted by closing: side effects such as cache
    /// commits still happen.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let output = fut.await;
        if self.token.is_cancelled() {
            trace!("discarding result for closed view scope");
            return None;
        }
        Some(output)
    }
}
