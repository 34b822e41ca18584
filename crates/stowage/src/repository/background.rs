//! Detached cache maintenance.
//!
//! TTL refreshes after a cache hit and write-backs after a store hit run as
//! detached tasks. They never fail the load that spawned them; failures are
//! handed to a [`BackgroundObserver`] instead.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::error::{RepositoryError, Result};

/// Kind of detached cache operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundTask {
    /// Re-arming the TTL of a key after a cache hit.
    RefreshTtl,
    /// Writing a record loaded from the store back into the cache.
    WriteBack,
}

impl fmt::Display for BackgroundTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundTask::RefreshTtl => f.write_str("ttl refresh"),
            BackgroundTask::WriteBack => f.write_str("cache write-back"),
        }
    }
}

/// Sink for failures of detached cache operations.
pub trait BackgroundObserver: Send + Sync {
    fn on_failure(&self, task: BackgroundTask, key: &str, error: &RepositoryError);
}

/// Default observer: logs every failure as a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BackgroundObserver for TracingObserver {
    fn on_failure(&self, task: BackgroundTask, key: &str, error: &RepositoryError) {
        tracing::warn!(%task, key, error = %error, "Background cache operation failed");
    }
}

/// Runs `work` on its own task, reporting a failure to `observer`.
pub(crate) fn spawn_detached<F>(
    observer: Arc<dyn BackgroundObserver>,
    task: BackgroundTask,
    key: String,
    work: F,
) where
    F: Future<Output = Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        match work.await {
            Ok(()) => tracing::trace!(%task, key = %key, "Background cache operation done"),
            Err(err) => observer.on_failure(task, &key, &err),
        }
    });
}
