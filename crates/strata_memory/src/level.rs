// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory cache level implementation using moka.

use std::hash::Hash;

use moka::future::Cache;
use strata_level::{CacheLevel, Error, Result};

use crate::builder::MemoryLevelBuilder;

/// An in-memory cache level backed by moka.
///
/// This level provides concurrent access with automatic eviction based on
/// capacity. A miss reports [`Error::NotFound`]; storing and clearing cannot
/// fail. Memory pressure sheds every entry.
///
/// Clones share the same underlying cache.
///
/// # Examples
///
/// ```
/// use strata_level::CacheLevel;
/// use strata_memory::MemoryLevel;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let level = MemoryLevel::<String, i32>::new();
///
/// level.set(&"key".to_string(), 42).await;
/// assert_eq!(level.get(&"key".to_string()).await.unwrap(), 42);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryLevel<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
}

impl<K, V> Default for MemoryLevel<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryLevel<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new unbounded in-memory level.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new in-memory level with a maximum capacity.
    ///
    /// Once the capacity is reached, entries are evicted using the `TinyLFU`
    /// policy (combination of LRU eviction and LFU admission).
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    /// Creates a new builder for configuring an in-memory level.
    #[must_use]
    pub fn builder() -> MemoryLevelBuilder<K, V> {
        MemoryLevelBuilder::new()
    }

    /// Constructs a `MemoryLevel` from a builder.
    pub(crate) fn from_builder(builder: &MemoryLevelBuilder<K, V>) -> Self {
        let mut moka_builder = Cache::builder();

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
        }
    }

    /// Returns the number of entries in the level.
    ///
    /// The count is eventually consistent; recently completed operations may
    /// not be reflected immediately.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl<K, V> CacheLevel<K, V> for MemoryLevel<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<V> {
        self.inner.get(key).await.ok_or(Error::NotFound)
    }

    async fn set(&self, key: &K, value: V) {
        self.inner.insert(key.clone(), value).await;
    }

    async fn clear(&self) {
        self.inner.invalidate_all();
    }

    async fn on_memory_pressure(&self) {
        // Resident entries are a convenience; shed them all and let the
        // pipeline refill from the levels below.
        self.inner.invalidate_all();
    }
}
