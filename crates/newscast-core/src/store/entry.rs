use std::sync::Arc;

use serde::Serialize;

use super::CacheKey;
use crate::error::{CoreError, ErrorInfo, ErrorKind};

/// Lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    /// Never loaded.
    Idle,
    Loading,
    Ready,
    /// Last load failed. Earlier data, if any, is still present.
    Error,
}

/// The cached state of one remote resource.
///
/// `Ready` always carries data and no error. `Error` carries an error and
/// possibly stale data from an earlier successful load.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub key: CacheKey,
    pub data: Option<Arc<T>>,
    pub status: CacheStatus,
    pub error: Option<ErrorInfo>,
    /// Set by `invalidate`; the next `get` refetches.
    pub invalidated: bool,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            data: self.data.clone(),
            status: self.status,
            error: self.error.clone(),
            invalidated: self.invalidated,
        }
    }
}

impl<T> CacheEntry<T> {
    pub(crate) fn idle(key: CacheKey) -> Self {
        Self {
            key,
            data: None,
            status: CacheStatus::Idle,
            error: None,
            invalidated: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == CacheStatus::Ready
    }

    pub fn is_loading(&self) -> bool {
        self.status == CacheStatus::Loading
    }

    /// Whether a `get` would start a load instead of returning this entry.
    pub(crate) fn needs_load(&self) -> bool {
        match self.status {
            CacheStatus::Idle => true,
            CacheStatus::Loading => false,
            CacheStatus::Ready | CacheStatus::Error => self.invalidated,
        }
    }

    /// Data of a `Ready` entry, or the retained error.
    ///
    /// Stale data of an `Error` entry is not returned here; see
    /// [`CacheEntry::last_known`].
    pub fn to_result(&self) -> Result<Arc<T>, ErrorInfo> {
        match (self.status, &self.data) {
            (CacheStatus::Ready, Some(data)) => Ok(Arc::clone(data)),
            _ => Err(self.failure()),
        }
    }

    /// Whatever data the entry holds, fresh or stale.
    pub fn last_known(&self) -> Result<Arc<T>, CoreError> {
        self.data
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| CoreError::ResourceUnavailable {
                key: self.key.to_string(),
                cause: self.failure(),
            })
    }

    fn failure(&self) -> ErrorInfo {
        self.error.clone().unwrap_or_else(|| ErrorInfo {
            kind: ErrorKind::Internal,
            status: None,
            message: format!(
                "cache entry {} has no data (status {:?})",
                self.key, self.status
            ),
        })
    }
}
