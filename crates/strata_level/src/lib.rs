// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Core cache level abstractions for building layered cache pipelines.
//!
//! This crate defines the [`CacheLevel`] trait that every cache tier must satisfy,
//! along with the [`Error`] taxonomy shared by all levels and adapters.
//!
//! # Overview
//!
//! A cache level is one tier in a pipeline: it can fetch a value for a key, store
//! a value best-effort, drop everything, and react to memory pressure. Levels are
//! composed into pipelines by the `strata` crate; this crate only defines the
//! contract and the test doubles used against it.
//!
//! # Implementing a Cache Level
//!
//! ```
//! use strata_level::{CacheLevel, Error};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct TableLevel<K, V>(RwLock<HashMap<K, V>>);
//!
//! impl<K, V> CacheLevel<K, V> for TableLevel<K, V>
//! where
//!     K: Clone + Eq + std::hash::Hash + Send + Sync,
//!     V: Clone + Send + Sync,
//! {
//!     async fn get(&self, key: &K) -> Result<V, Error> {
//!         self.0.read().unwrap().get(key).cloned().ok_or(Error::NotFound)
//!     }
//!
//!     async fn set(&self, key: &K, value: V) {
//!         self.0.write().unwrap().insert(key.clone(), value);
//!     }
//!
//!     async fn clear(&self) {
//!         self.0.write().unwrap().clear();
//!     }
//! }
//! ```
//!
//! # Thread Safety
//!
//! The trait requires `Send + Sync` and all futures it produces are `Send`.
//! Implementations are expected to be internally thread-safe; the composition
//! layer never adds locking on their behalf.

pub mod error;
mod level;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use level::CacheLevel;
