// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory levels.
//!
//! This module provides a builder API for `MemoryLevel` that abstracts the
//! underlying moka configuration, providing a stable API surface without
//! exposing moka's types.

use std::hash::Hash;
use std::marker::PhantomData;

use crate::level::MemoryLevel;

/// Builder for configuring a `MemoryLevel`.
///
/// # Examples
///
/// ```
/// use strata_memory::MemoryLevel;
///
/// let level = MemoryLevel::<String, i32>::builder()
///     .max_capacity(1000)
///     .initial_capacity(100)
///     .name("thumbnails")
///     .build();
/// ```
#[derive(Debug)]
pub struct MemoryLevelBuilder<K, V> {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> Default for MemoryLevelBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryLevelBuilder<K, V> {
    /// Creates a new builder with default settings.
    ///
    /// The default configuration creates an unbounded level with `TinyLFU`
    /// eviction policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            name: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the maximum capacity of the level.
    ///
    /// If not set, the level is unbounded (limited only by available memory).
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the initial capacity (pre-allocation hint) for the level.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a name for the level, used in diagnostics.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<K, V> MemoryLevelBuilder<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Builds the configured `MemoryLevel`.
    #[must_use]
    pub fn build(self) -> MemoryLevel<K, V> {
        MemoryLevel::from_builder(&self)
    }
}
