// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock cache level for testing.
//!
//! This module provides [`MockLevel`], an in-memory level that records every
//! operation and supports failure injection, for verifying composition
//! behavior (which levels were consulted, what was written back, and so on).

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::Mutex;

use crate::{CacheLevel, Error, Result};

/// Recorded level operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelOp<K, V> {
    /// A get operation was performed with the given key.
    Get(K),
    /// A set operation was performed with the given key and value.
    Set {
        /// The key that was stored.
        key: K,
        /// The value that was stored.
        value: V,
    },
    /// A clear operation was performed.
    Clear,
    /// A memory pressure signal was delivered.
    MemoryPressure,
}

type FailPredicate<K, V> = Box<dyn Fn(&LevelOp<K, V>) -> bool + Send + Sync>;

/// A configurable mock level for testing.
///
/// Values live in a plain table; every operation is recorded for later
/// verification and a predicate can force operations to fail. A failing `get`
/// reports an upstream error; a failing `set` or `clear` silently does
/// nothing, which is exactly what the level contract allows.
///
/// Clones share the same underlying state, so a test can keep a handle to a
/// level after handing it to a pipeline.
///
/// # Examples
///
/// ```
/// use strata_level::{CacheLevel, testing::{LevelOp, MockLevel}};
///
/// # futures::executor::block_on(async {
/// let level = MockLevel::<String, i32>::new();
///
/// level.set(&"key".to_string(), 42).await;
/// let value = level.get(&"key".to_string()).await.unwrap();
/// assert_eq!(value, 42);
///
/// assert_eq!(level.operations(), vec![
///     LevelOp::Set { key: "key".to_string(), value: 42 },
///     LevelOp::Get("key".to_string()),
/// ]);
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use strata_level::{CacheLevel, testing::{LevelOp, MockLevel}};
///
/// # futures::executor::block_on(async {
/// let level: MockLevel<String, i32> = MockLevel::new();
///
/// // Refuse all fetches
/// level.fail_when(|op| matches!(op, LevelOp::Get(_)));
/// assert!(level.get(&"key".to_string()).await.is_err());
/// # });
/// ```
pub struct MockLevel<K, V> {
    data: Arc<Mutex<HashMap<K, V>>>,
    operations: Arc<Mutex<Vec<LevelOp<K, V>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<K, V>>>>,
}

impl<K, V> std::fmt::Debug for MockLevel<K, V>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLevel")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl<K, V> Clone for MockLevel<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, V> Default for MockLevel<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockLevel<K, V> {
    /// Creates a new empty mock level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }
}

impl<K, V> MockLevel<K, V>
where
    K: Eq + Hash,
{
    /// Creates a mock level with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<K, V>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of entries in the level.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the level contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.lock().contains_key(key)
    }
}

impl<K, V> MockLevel<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Peeks at the stored value without recording a get operation.
    ///
    /// Use this when asserting on a level's contents so the assertion itself
    /// does not pollute the recorded operations.
    #[must_use]
    pub fn value(&self, key: &K) -> Option<V> {
        self.data.lock().get(key).cloned()
    }
}

impl<K, V> MockLevel<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Sets a predicate that determines when operations should fail.
    ///
    /// A failing `get` returns an upstream error. A failing `set` or `clear`
    /// records the operation but leaves the data untouched, since those
    /// operations have no way to report failure.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&LevelOp<K, V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<LevelOp<K, V>> {
        self.operations.lock().clone()
    }

    /// Returns the number of get operations recorded so far.
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.operations
            .lock()
            .iter()
            .filter(|op| matches!(op, LevelOp::Get(_)))
            .count()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: LevelOp<K, V>) {
        self.operations.lock().push(op);
    }

    fn should_fail(&self, op: &LevelOp<K, V>) -> bool {
        self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op))
    }
}

impl<K, V> CacheLevel<K, V> for MockLevel<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<V> {
        let op = LevelOp::Get(key.clone());
        let fail = self.should_fail(&op);
        self.record(op);
        if fail {
            return Err(Error::upstream("mock: get refused"));
        }
        self.data.lock().get(key).cloned().ok_or(Error::NotFound)
    }

    async fn set(&self, key: &K, value: V) {
        let op = LevelOp::Set {
            key: key.clone(),
            value: value.clone(),
        };
        let fail = self.should_fail(&op);
        self.record(op);
        if fail {
            return;
        }
        self.data.lock().insert(key.clone(), value);
    }

    async fn clear(&self) {
        let op = LevelOp::Clear;
        let fail = self.should_fail(&op);
        self.record(op);
        if fail {
            return;
        }
        self.data.lock().clear();
    }

    async fn on_memory_pressure(&self) {
        self.record(LevelOp::MemoryPressure);
    }
}
