// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key and value transformation adapters.
//!
//! These decorators wrap a cache level together with a [`Transformer`] so a
//! pipeline built over one native key or value type can be exposed under
//! another, letting heterogeneous levels compose uniformly.

use std::marker::PhantomData;

use strata_level::{CacheLevel, Error, Result};

use crate::transform::Transformer;

/// A cache level whose values are transformed on the way in and out.
///
/// Wraps a `CacheLevel<K, V1>` and a `Transformer<V1, V2>`, exposing a
/// `CacheLevel<K, V2>`. A fetched value that does not decode fails the fetch
/// with [`Error::TransformationFailed`] even though the wrapped fetch
/// succeeded: a value that cannot be decoded is treated as absent. A stored
/// value that does not encode is silently dropped, since `set` has no result
/// channel.
pub struct ValueMappedCache<K, V1, V2, L> {
    inner: L,
    transformer: Transformer<V1, V2>,
    _phantom: PhantomData<K>,
}

impl<K, V1, V2, L> std::fmt::Debug for ValueMappedCache<K, V1, V2, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueMappedCache").finish_non_exhaustive()
    }
}

impl<K, V1, V2, L> ValueMappedCache<K, V1, V2, L> {
    /// Wraps a level with a value transformer.
    pub fn new(inner: L, transformer: Transformer<V1, V2>) -> Self {
        Self {
            inner,
            transformer,
            _phantom: PhantomData,
        }
    }
}

impl<K, V1, V2, L> CacheLevel<K, V2> for ValueMappedCache<K, V1, V2, L>
where
    K: Send + Sync,
    V1: Send + Sync + 'static,
    V2: Send + Sync + 'static,
    L: CacheLevel<K, V1>,
{
    async fn get(&self, key: &K) -> Result<V2> {
        let raw = self.inner.get(key).await?;
        self.transformer.forward(raw).ok_or(Error::TransformationFailed)
    }

    async fn set(&self, key: &K, value: V2) {
        match self.transformer.backward(value) {
            Some(raw) => self.inner.set(key, raw).await,
            None => tracing::debug!("value did not encode, dropping write"),
        }
    }

    async fn clear(&self) {
        self.inner.clear().await;
    }

    async fn on_memory_pressure(&self) {
        self.inner.on_memory_pressure().await;
    }
}

/// A cache level addressed through a friendlier external key type.
///
/// Wraps a `CacheLevel<K1, V>` and a `Transformer<K2, K1>` (the external key
/// maps *forward* to the internal key), exposing a `CacheLevel<K2, V>`. A key
/// that does not convert fails the fetch with
/// [`Error::TransformationFailed`] — or drops the write — without touching the
/// wrapped level.
pub struct KeyMappedCache<K1, K2, V, L> {
    inner: L,
    transformer: Transformer<K2, K1>,
    _phantom: PhantomData<V>,
}

impl<K1, K2, V, L> std::fmt::Debug for KeyMappedCache<K1, K2, V, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMappedCache").finish_non_exhaustive()
    }
}

impl<K1, K2, V, L> KeyMappedCache<K1, K2, V, L> {
    /// Wraps a level with a key transformer.
    pub fn new(inner: L, transformer: Transformer<K2, K1>) -> Self {
        Self {
            inner,
            transformer,
            _phantom: PhantomData,
        }
    }
}

impl<K1, K2, V, L> CacheLevel<K2, V> for KeyMappedCache<K1, K2, V, L>
where
    K1: Send + Sync + 'static,
    K2: Clone + Send + Sync + 'static,
    V: Send + Sync,
    L: CacheLevel<K1, V>,
{
    async fn get(&self, key: &K2) -> Result<V> {
        let inner_key = self
            .transformer
            .forward(key.clone())
            .ok_or(Error::TransformationFailed)?;
        self.inner.get(&inner_key).await
    }

    async fn set(&self, key: &K2, value: V) {
        match self.transformer.forward(key.clone()) {
            Some(inner_key) => self.inner.set(&inner_key, value).await,
            None => tracing::debug!("key did not transform, dropping write"),
        }
    }

    async fn clear(&self) {
        self.inner.clear().await;
    }

    async fn on_memory_pressure(&self) {
        self.inner.on_memory_pressure().await;
    }
}
