// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Routing combinators: condition-gated and switched levels.

use std::{marker::PhantomData, sync::Arc};

use futures::join;

use strata_level::{CacheLevel, Error, Result};

type KeyPredicate<K> = Arc<dyn Fn(&K) -> bool + Send + Sync>;

/// A cache level that only answers fetches for keys matching a predicate.
///
/// A rejected key is treated as absent at this level ([`Error::NotFound`]), so
/// inside a composed pipeline the fetch simply falls through to the next
/// level. Writes and maintenance operations pass through unconditionally.
pub struct ConditionedCache<K, V, L> {
    inner: L,
    condition: KeyPredicate<K>,
    _phantom: PhantomData<V>,
}

impl<K, V, L> std::fmt::Debug for ConditionedCache<K, V, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionedCache").finish_non_exhaustive()
    }
}

impl<K, V, L> ConditionedCache<K, V, L> {
    /// Gates fetches on the given key predicate.
    pub fn new<F>(inner: L, condition: F) -> Self
    where
        F: Fn(&K) -> bool + Send + Sync + 'static,
    {
        Self {
            inner,
            condition: Arc::new(condition),
            _phantom: PhantomData,
        }
    }
}

impl<K, V, L> CacheLevel<K, V> for ConditionedCache<K, V, L>
where
    K: Send + Sync,
    V: Send + Sync,
    L: CacheLevel<K, V>,
{
    async fn get(&self, key: &K) -> Result<V> {
        if !(self.condition)(key) {
            tracing::debug!("key rejected by condition, reporting absent");
            return Err(Error::NotFound);
        }
        self.inner.get(key).await
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

/// Routes each key to one of two lanes.
///
/// Keys matching the predicate use the left lane, the rest the right lane,
/// for both fetches and writes. Clears and memory pressure signals fan out to
/// both lanes.
pub struct SwitchedCache<K, V, A, B> {
    left: A,
    right: B,
    route_left: KeyPredicate<K>,
    _phantom: PhantomData<V>,
}

impl<K, V, A, B> std::fmt::Debug for SwitchedCache<K, V, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchedCache").finish_non_exhaustive()
    }
}

impl<K, V, A, B> SwitchedCache<K, V, A, B> {
    /// Routes keys matching `route_left` to `left`, the rest to `right`.
    pub fn new<F>(left: A, right: B, route_left: F) -> Self
    where
        F: Fn(&K) -> bool + Send + Sync + 'static,
    {
        Self {
            left,
            right,
            route_left: Arc::new(route_left),
            _phantom: PhantomData,
        }
    }
}

impl<K, V, A, B> CacheLevel<K, V> for SwitchedCache<K, V, A, B>
where
    K: Send + Sync,
    V: Send + Sync,
    A: CacheLevel<K, V>,
    B: CacheLevel<K, V>,
{
    async fn get(&self, key: &K) -> Result<V> {
        if (self.route_left)(key) {
            self.left.get(key).await
        } else {
            self.right.get(key).await
        }
    }

    async fn set(&self, key: &K, value: V) {
        if (self.route_left)(key) {
            self.left.set(key, value).await;
        } else {
            self.right.set(key, value).await;
        }
    }

    async fn clear(&self) {
        join!(self.left.clear(), self.right.clear());
    }

    async fn on_memory_pressure(&self) {
        join!(self.left.on_memory_pressure(), self.right.on_memory_pressure());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_level::testing::MockLevel;

    #[tokio::test]
    async fn conditioned_level_reports_rejected_keys_as_absent() {
        let inner = MockLevel::<String, i32>::new();
        inner.set(&"blocked".to_string(), 1).await;
        inner.clear_operations();

        let gated = ConditionedCache::new(inner.clone(), |key: &String| !key.starts_with("blocked"));

        let err = gated.get(&"blocked".to_string()).await.expect_err("expected rejection");
        assert!(err.is_not_found());
        // The wrapped level was never consulted.
        assert_eq!(inner.get_count(), 0);

        gated.set(&"allowed".to_string(), 2).await;
        assert_eq!(gated.get(&"allowed".to_string()).await.expect("get failed"), 2);
    }

    #[tokio::test]
    async fn switched_level_routes_by_key() {
        let left = MockLevel::<String, i32>::new();
        let right = MockLevel::<String, i32>::new();

        let switched = SwitchedCache::new(left.clone(), right.clone(), |key: &String| key.starts_with("l:"));

        switched.set(&"l:a".to_string(), 1).await;
        switched.set(&"r:b".to_string(), 2).await;

        assert_eq!(left.value(&"l:a".to_string()), Some(1));
        assert_eq!(left.value(&"r:b".to_string()), None);
        assert_eq!(right.value(&"r:b".to_string()), Some(2));

        assert_eq!(switched.get(&"l:a".to_string()).await.expect("get failed"), 1);
        assert_eq!(switched.get(&"r:b".to_string()).await.expect("get failed"), 2);
    }

    #[tokio::test]
    async fn switched_level_clears_both_lanes() {
        let left = MockLevel::<String, i32>::new();
        let right = MockLevel::<String, i32>::new();

        let switched = SwitchedCache::new(left.clone(), right.clone(), |key: &String| key.starts_with("l:"));
        switched.set(&"l:a".to_string(), 1).await;
        switched.set(&"r:b".to_string(), 2).await;

        switched.clear().await;

        assert_eq!(left.entry_count(), 0);
        assert_eq!(right.entry_count(), 0);
    }
}
