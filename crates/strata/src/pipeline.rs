// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The declarative pipeline surface.
//!
//! [`Pipeline`] wraps any level so that further levels can be chained with the
//! `>>` operator, and [`CacheLevelExt`] provides the combinator methods on
//! every level. Both surfaces build exactly the same composites.

use std::{hash::Hash, marker::PhantomData};

use strata_level::{CacheLevel, Result};

use crate::{
    adapt::{KeyMappedCache, ValueMappedCache},
    coalesce::CoalescedCache,
    compose::ComposedCache,
    route::ConditionedCache,
    transform::Transformer,
};

/// A cache level wrapped for declarative chaining.
///
/// `Pipeline::new(memory) >> disk >> network` chains levels left to right: the
/// leftmost level is consulted first and deeper levels fill the nearer ones on
/// a miss. The wrapper adds no behavior of its own; it exists so `>>` has a
/// type to hang off.
///
/// # Examples
///
/// ```
/// use strata::{CacheLevel, MemoryLevel, Pipeline};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let near = MemoryLevel::<String, String>::new();
/// let far = MemoryLevel::<String, String>::new();
/// far.set(&"k".to_string(), "v".to_string()).await;
///
/// let cache = Pipeline::new(near) >> far;
/// assert_eq!(cache.get(&"k".to_string()).await.unwrap(), "v".to_string());
/// # }
/// ```
pub struct Pipeline<K, V, L> {
    level: L,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V, L> std::fmt::Debug for Pipeline<K, V, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl<K, V, L> Pipeline<K, V, L> {
    /// Starts a pipeline at the given level.
    pub fn new(level: L) -> Self {
        Self {
            level,
            _phantom: PhantomData,
        }
    }

    /// Unwraps the pipeline, returning the underlying composed level.
    pub fn into_inner(self) -> L {
        self.level
    }

    /// Exposes the pipeline under a friendlier external key type.
    #[must_use]
    pub fn map_keys<K2>(self, transformer: Transformer<K2, K>) -> Pipeline<K2, V, KeyMappedCache<K, K2, V, L>> {
        Pipeline::new(KeyMappedCache::new(self.level, transformer))
    }

    /// Exposes the pipeline under a transformed value type.
    #[must_use]
    pub fn map_values<V2>(self, transformer: Transformer<V, V2>) -> Pipeline<K, V2, ValueMappedCache<K, V, V2, L>> {
        Pipeline::new(ValueMappedCache::new(self.level, transformer))
    }

    /// Deduplicates concurrent fetches per key across the whole pipeline.
    #[must_use]
    pub fn coalesced(self) -> Pipeline<K, V, CoalescedCache<K, V, L>> {
        Pipeline::new(CoalescedCache::new(self.level))
    }
}

impl<K, V, L> CacheLevel<K, V> for Pipeline<K, V, L>
where
    K: Send + Sync,
    V: Send + Sync,
    L: CacheLevel<K, V>,
{
    async fn get(&self, key: &K) -> Result<V> {
        self.level.get(key).await
    }

    async fn set(&self, key: &K, value: V) {
        self.level.set(key, value).await;
    }

    async fn clear(&self) {
        self.level.clear().await;
    }

    async fn on_memory_pressure(&self) {
        self.level.on_memory_pressure().await;
    }
}

/// `pipeline >> level` chains another level onto the pipeline, equivalent to
/// composing the two levels directly.
impl<K, V, L, R> std::ops::Shr<R> for Pipeline<K, V, L>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: CacheLevel<K, V> + 'static,
    R: CacheLevel<K, V> + 'static,
{
    type Output = Pipeline<K, V, ComposedCache<K, V, L, R>>;

    fn shr(self, next: R) -> Self::Output {
        Pipeline::new(ComposedCache::new(self.level, next))
    }
}

/// Combinator methods available on every cache level.
///
/// This trait is automatically implemented for all types that implement
/// [`CacheLevel`]; it is the method-call twin of the [`Pipeline`] operator
/// surface.
pub trait CacheLevelExt<K, V>: CacheLevel<K, V> + Sized {
    /// Chains this level with a deeper one.
    ///
    /// Fetches try `self` first and fall through to `next` on a miss, filling
    /// `self` in the background when `next` hits.
    fn compose<S>(self, next: S) -> ComposedCache<K, V, Self, S>
    where
        S: CacheLevel<K, V>,
    {
        ComposedCache::new(self, next)
    }

    /// Exposes this level under a transformed value type.
    fn map_values<V2>(self, transformer: Transformer<V, V2>) -> ValueMappedCache<K, V, V2, Self> {
        ValueMappedCache::new(self, transformer)
    }

    /// Exposes this level under a friendlier external key type.
    fn map_keys<K2>(self, transformer: Transformer<K2, K>) -> KeyMappedCache<K, K2, V, Self> {
        KeyMappedCache::new(self, transformer)
    }

    /// Deduplicates concurrent fetches per key.
    fn coalesced(self) -> CoalescedCache<K, V, Self>
    where
        K: Eq + Hash,
    {
        CoalescedCache::new(self)
    }

    /// Gates fetches on a key predicate; rejected keys read as absent.
    fn when<F>(self, condition: F) -> ConditionedCache<K, V, Self>
    where
        F: Fn(&K) -> bool + Send + Sync + 'static,
    {
        ConditionedCache::new(self, condition)
    }

    /// Wraps this level so further levels can be chained with `>>`.
    fn into_pipeline(self) -> Pipeline<K, V, Self> {
        Pipeline::new(self)
    }
}

impl<K, V, T> CacheLevelExt<K, V> for T where T: CacheLevel<K, V> {}
