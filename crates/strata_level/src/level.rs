// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for cache levels.
//!
//! [`CacheLevel`] defines the interface that every tier of a cache pipeline must
//! implement. The trait is designed for composition: implement the storage
//! operations, then use `strata` to chain levels, adapt key/value types, and
//! coalesce duplicate fetches.

use std::sync::Arc;

use crate::Error;

/// Trait for a single tier of a cache pipeline.
///
/// A level can fetch a value for a key, store a value, drop all of its entries,
/// and react to memory pressure. Fetching is the only fallible operation:
/// `set` and `clear` have no result channel by design, so a level that cannot
/// store or clear logs the problem and carries on. Callers must never be able
/// to observe a write failure through a successful read path.
///
/// Only `on_memory_pressure` has a default implementation (a no-op, which is
/// right for levels with no resident state to shed, such as remote fetchers).
pub trait CacheLevel<K, V>: Send + Sync {
    /// Fetches the value for a key.
    ///
    /// A definite miss is reported as [`Error::NotFound`]; any other failure
    /// uses the remaining variants of [`Error`].
    fn get(&self, key: &K) -> impl Future<Output = Result<V, Error>> + Send;

    /// Stores a value for a key, best effort.
    ///
    /// There is no result channel: a level that cannot persist the value drops
    /// the write silently (logging it if it cares).
    fn set(&self, key: &K, value: V) -> impl Future<Output = ()> + Send;

    /// Drops all entries held by this level, best effort.
    fn clear(&self) -> impl Future<Output = ()> + Send;

    /// Signals that the process is under memory pressure.
    ///
    /// In-memory levels typically respond by shedding entries; persistent and
    /// remote levels ignore the signal.
    fn on_memory_pressure(&self) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

/// A shared level is itself a level.
///
/// This lets one level instance (say, a process-wide memory level) sit inside
/// several pipelines at once.
impl<K, V, L> CacheLevel<K, V> for Arc<L>
where
    K: Send + Sync,
    V: Send + Sync,
    L: CacheLevel<K, V>,
{
    async fn get(&self, key: &K) -> Result<V, Error> {
        self.as_ref().get(key).await
    }

    async fn set(&self, key: &K, value: V) {
        self.as_ref().set(key, value).await;
    }

    async fn clear(&self) {
        self.as_ref().clear().await;
    }

    async fn on_memory_pressure(&self) {
        self.as_ref().on_memory_pressure().await;
    }
}
