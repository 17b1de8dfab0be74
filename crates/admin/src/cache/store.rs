//! In-memory store of list pages.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};

use super::{ListPatch, ListQueryKey, Record};

/// A cached list page: the rows and the total count for the same filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedList<T> {
    pub records: Vec<T>,
    pub total: u64,
}

impl<T: Record> CachedList<T> {
    #[must_use]
    pub const fn new(records: Vec<T>, total: u64) -> Self {
        Self { records, total }
    }

    /// Apply a mutation patch, keeping `total` in step with the rows.
    #[must_use]
    pub fn patched(&self, patch: ListPatch<T>) -> Self {
        let before = self.records.len();
        let created = matches!(patch, ListPatch::Created(_));
        let records = patch.apply(&self.records);
        let after = records.len();

        let total = if after >= before {
            // A replayed create does not grow the list
            if created && after > before {
                self.total + 1
            } else {
                self.total
            }
        } else {
            self.total.saturating_sub((before - after) as u64)
        };

        Self { records, total }
    }
}

/// List pages of one entity type keyed by [`ListQueryKey`].
///
/// Slots are created only by [`ListCache::put`] after a successful fetch.
/// Patching never creates a slot: when nothing is cached for the key the
/// patch is dropped and the next fetch picks the change up from the server.
#[derive(Clone)]
pub struct ListCache<T: Record> {
    inner: Cache<ListQueryKey, Arc<CachedList<T>>>,
}

impl<T: Record> ListCache<T> {
    /// Create a cache holding up to `capacity` pages, each for at most `ttl`.
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    pub async fn get(&self, key: &ListQueryKey) -> Option<Arc<CachedList<T>>> {
        self.inner.get(key).await
    }

    /// Store a freshly fetched page, replacing whatever was cached.
    pub async fn put(&self, key: ListQueryKey, list: CachedList<T>) {
        self.inner.insert(key, Arc::new(list)).await;
    }

    pub async fn invalidate(&self, key: &ListQueryKey) {
        self.inner.invalidate(key).await;
    }

    /// Patch the page cached under `key`.
    ///
    /// The read and the write happen as one atomic replacement of the slot.
    /// Returns `true` if a page was cached and has been replaced.
    pub async fn patch(&self, key: &ListQueryKey, patch: ListPatch<T>) -> bool {
        let id = patch.record_id();
        let result = self
            .inner
            .entry_by_ref(key)
            .and_compute_with(|entry| {
                let op = match entry {
                    Some(entry) => Op::Put(Arc::new(entry.into_value().patched(patch))),
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        let patched = matches!(result, CompResult::ReplacedWith(_));
        tracing::debug!(key = %key, id = ?id, patched, "List cache patch");
        patched
    }
}
