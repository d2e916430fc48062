// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A composable layered caching library.
//!
//! This crate provides a small algebra for building cache pipelines:
//! - Cache levels (memory, disk, network, anything implementing
//!   [`CacheLevel`]) chain into pipelines where fetches fall through on a miss
//!   and hits fill the nearer levels in the background
//! - Two-way [`Transformer`]s compose into chains that adapt a pipeline's key
//!   or value types at its boundary
//! - Concurrent fetches for the same key are coalesced into a single upstream
//!   request
//!
//! # Examples
//!
//! ## A Two-Level Pipeline
//!
//! ```
//! use strata::{CacheLevel, MemoryLevel, Pipeline};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let near = MemoryLevel::<String, String>::new();
//! let far = MemoryLevel::<String, String>::new();
//!
//! let cache = Pipeline::new(near) >> far;
//!
//! cache.set(&"key".to_string(), "value".to_string()).await;
//! assert_eq!(cache.get(&"key".to_string()).await.unwrap(), "value".to_string());
//! # }
//! ```
//!
//! ## Adapting Types at the Boundary
//!
//! ```
//! use strata::{CacheLevel, MemoryLevel, Pipeline, transformers};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // A pipeline storing raw bytes, exposed as a cache of strings.
//! let store = MemoryLevel::<String, Vec<u8>>::new();
//! let cache = Pipeline::new(store).map_values(transformers::utf8());
//!
//! cache.set(&"greeting".to_string(), "hello".to_string()).await;
//! assert_eq!(cache.get(&"greeting".to_string()).await.unwrap(), "hello".to_string());
//! # }
//! ```

pub mod adapt;
pub mod coalesce;
pub mod compose;
pub mod pipeline;
pub mod route;
pub mod transform;

#[doc(inline)]
pub use adapt::{KeyMappedCache, ValueMappedCache};
#[doc(inline)]
pub use coalesce::CoalescedCache;
#[doc(inline)]
pub use compose::ComposedCache;
#[doc(inline)]
pub use pipeline::{CacheLevelExt, Pipeline};
#[doc(inline)]
pub use route::{ConditionedCache, SwitchedCache};
#[doc(inline)]
pub use strata_level::{CacheLevel, Error, Result};
#[cfg(feature = "memory")]
#[doc(inline)]
pub use strata_memory::{MemoryLevel, MemoryLevelBuilder};
#[doc(inline)]
pub use transform::{Transformer, transformers};

#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use strata_level::testing::{LevelOp, MockLevel};
