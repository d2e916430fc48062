// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! High-performance in-memory cache level backed by moka.
//!
//! This crate provides [`MemoryLevel`], a concurrent in-memory cache level using
//! moka's `TinyLFU` eviction algorithm. Use [`MemoryLevelBuilder`] to configure
//! capacity without exposing moka types directly.
//!
//! # Quick Start
//!
//! ```
//! use strata_level::CacheLevel;
//! use strata_memory::MemoryLevel;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let level = MemoryLevel::<String, i32>::builder().max_capacity(1000).build();
//!
//! level.set(&"key".to_string(), 42).await;
//! assert_eq!(level.get(&"key".to_string()).await.unwrap(), 42);
//! # }
//! ```
//!
//! # Memory Pressure
//!
//! A memory level responds to [`CacheLevel::on_memory_pressure`] by shedding
//! every entry: resident data is a convenience, and the pipeline can always
//! refill it from the levels below.

pub mod builder;
mod level;

#[doc(inline)]
pub use builder::MemoryLevelBuilder;
#[doc(inline)]
pub use level::MemoryLevel;
