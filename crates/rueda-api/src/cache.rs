//! # Query Cache
//!
//! Keeps the last result of each read query for a refresh interval and makes
//! concurrent readers of the same key share one fetch.
//!
//! ```text
//!  fetch("products", f)
//!       │
//!       ▼
//!  slot("products") ── per-key async lock ── waits if another fetch is running
//!       │
//!       ├── fresh entry? ──► clone and return
//!       │
//!       └── stale/missing ──► f().await ──► store ──► return
//!
//!  invalidate("clients") drops "clients", "clients/7/credits", ...
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::error::ApiResult;

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

type Slot = Arc<AsyncMutex<Option<Entry>>>;

/// Per-key cache of query results.
#[derive(Clone)]
pub struct QueryCache {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
    refresh_interval: Duration,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("keys", &self.len())
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}

impl QueryCache {
    pub fn new(refresh_interval: Duration) -> Self {
        QueryCache {
            slots: Arc::new(Mutex::new(HashMap::new())),
            refresh_interval,
        }
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        slots.entry(key.to_string()).or_default().clone()
    }

    /// Returns the cached value for `key` or runs `fetcher` to refresh it.
    ///
    /// Errors are not cached; the next call fetches again.
    pub async fn fetch<T, F, Fut>(&self, key: &str, fetcher: F) -> ApiResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.refresh_interval {
                if let Some(value) = cached.value.downcast_ref::<T>() {
                    debug!(key = %key, "Query cache hit");
                    return Ok(value.clone());
                }
            }
        }

        debug!(key = %key, "Query cache miss");
        let value = fetcher().await?;
        *entry = Some(Entry {
            value: Arc::new(value.clone()),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drops every key starting with `prefix`.
    pub fn invalidate(&self, prefix: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        let before = slots.len();
        slots.retain(|key, _| !key.starts_with(prefix));
        debug!(prefix = %prefix, dropped = before - slots.len(), "Query cache invalidated");
    }

    pub fn invalidate_all(&self) {
        self.slots.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
