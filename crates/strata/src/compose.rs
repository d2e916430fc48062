// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Two-level cache composition.
//!
//! This module provides [`ComposedCache`], which chains two levels into one:
//! fetches try the first level and fall through to the second on a miss, with
//! the found value written back into the first level in the background.

use std::{marker::PhantomData, sync::Arc};

use futures::join;

use strata_level::{CacheLevel, Result};

pub(crate) struct ComposedInner<K, V, A, B> {
    pub(crate) first: A,
    pub(crate) second: B,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V, A, B> std::fmt::Debug for ComposedInner<K, V, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedInner").finish_non_exhaustive()
    }
}

/// Two cache levels chained into a single level.
///
/// On fetch, the first level is tried; on any failure there the second level
/// is consulted, and a hit is written back into the first level as a detached
/// background task (cache-fill-on-read). Writes, clears, and memory pressure
/// signals fan out to both children, so repeated pairwise composition yields
/// N-level pipelines with every level maintained.
///
/// The composite's failure is the second level's failure: an upper-level miss
/// is routine fall-through, not something worth surfacing.
///
/// Because the write-back task is spawned on the ambient tokio runtime, `get`
/// must be called from within one whenever a fall-through hit can occur.
///
/// # Examples
///
/// ```
/// use strata::{CacheLevel, CacheLevelExt, MemoryLevel};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fast = MemoryLevel::<String, i32>::new();
/// let slow = MemoryLevel::<String, i32>::new();
/// slow.set(&"k".to_string(), 42).await;
///
/// let cache = fast.compose(slow);
/// assert_eq!(cache.get(&"k".to_string()).await.unwrap(), 42);
/// # }
/// ```
pub struct ComposedCache<K, V, A, B> {
    pub(crate) inner: Arc<ComposedInner<K, V, A, B>>,
}

impl<K, V, A, B> std::fmt::Debug for ComposedCache<K, V, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedCache").finish_non_exhaustive()
    }
}

impl<K, V, A, B> Clone for ComposedCache<K, V, A, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, A, B> ComposedCache<K, V, A, B> {
    /// Chains two levels, with `first` consulted before `second`.
    pub fn new(first: A, second: B) -> Self {
        Self {
            inner: Arc::new(ComposedInner {
                first,
                second,
                _phantom: PhantomData,
            }),
        }
    }
}

impl<K, V, A, B> ComposedCache<K, V, A, B>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    A: CacheLevel<K, V> + 'static,
    B: CacheLevel<K, V> + 'static,
{
    /// Spawns the fill of the first level after a second-level hit.
    ///
    /// Fire-and-forget: the caller gets its value immediately and a failure to
    /// store is unobservable, as the level contract requires.
    fn write_back(&self, key: &K, value: V) {
        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        tracing::trace!("scheduling write-back into first level");
        tokio::spawn(async move {
            inner.first.set(&key, value).await;
        });
    }
}

impl<K, V, A, B> CacheLevel<K, V> for ComposedCache<K, V, A, B>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    A: CacheLevel<K, V> + 'static,
    B: CacheLevel<K, V> + 'static,
{
    async fn get(&self, key: &K) -> Result<V> {
        // The first lookup is not boxed to keep hits allocation-free.
        // The fall-through path is boxed to bound future size for deep pipelines.
        match self.inner.first.get(key).await {
            Ok(value) => Ok(value),
            Err(first_error) => {
                tracing::debug!(error = %first_error, "first level missed, consulting second");
                let value = Box::pin(self.inner.second.get(key)).await?;
                self.write_back(key, value.clone());
                Ok(value)
            }
        }
    }

    async fn set(&self, key: &K, value: V) {
        // Write-through: both children are stored concurrently.
        join!(
            Box::pin(self.inner.first.set(key, value.clone())),
            Box::pin(self.inner.second.set(key, value))
        );
    }

    async fn clear(&self) {
        join!(Box::pin(self.inner.first.clear()), Box::pin(self.inner.second.clear()));
    }

    async fn on_memory_pressure(&self) {
        join!(
            Box::pin(self.inner.first.on_memory_pressure()),
            Box::pin(self.inner.second.on_memory_pressure())
        );
    }
}
