// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Single-flight request coalescing for cache levels.

use std::{hash::Hash, sync::Arc};

use monoflight::MonoFlight;
use strata_level::{CacheLevel, Result};

/// A cache level whose fetches are deduplicated per key.
///
/// While a fetch for a key is in flight, further `get` calls for the same key
/// wait for that fetch instead of issuing their own; every waiter receives a
/// clone of the same outcome, success or failure. Fetches for distinct keys
/// proceed independently. Writes, clears, and memory pressure signals pass
/// straight through to the wrapped level.
///
/// The in-flight fetch runs as a detached task, so it completes (and fills
/// whatever the wrapped level fills) even if every caller stops waiting.
///
/// # Examples
///
/// ```
/// use strata::{CacheLevel, CacheLevelExt, MemoryLevel};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let level = MemoryLevel::<String, i32>::new();
/// level.set(&"k".to_string(), 42).await;
///
/// let cache = level.coalesced();
/// assert_eq!(cache.get(&"k".to_string()).await.unwrap(), 42);
/// # }
/// ```
pub struct CoalescedCache<K, V, L> {
    inner: Arc<L>,
    flight: MonoFlight<K, Result<V>>,
}

impl<K, V, L> std::fmt::Debug for CoalescedCache<K, V, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoalescedCache").finish_non_exhaustive()
    }
}

impl<K, V, L> CoalescedCache<K, V, L> {
    /// Wraps a level with per-key fetch deduplication.
    pub fn new(inner: L) -> Self {
        Self {
            inner: Arc::new(inner),
            flight: MonoFlight::default(),
        }
    }
}

impl<K, V, L> CacheLevel<K, V> for CoalescedCache<K, V, L>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: CacheLevel<K, V> + 'static,
{
    async fn get(&self, key: &K) -> Result<V> {
        let level = Arc::clone(&self.inner);
        let fetch_key = key.clone();
        self.flight
            .work(key, move || async move { level.get(&fetch_key).await })
            .await
    }

    async fn set(&self, key: &K, value: V) {
        self.inner.set(key, value).await;
    }

    async fn clear(&self) {
        self.inner.clear().await;
    }

    async fn on_memory_pressure(&self) {
        self.inner.on_memory_pressure().await;
    }
}
