// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Coalesces duplicate async fetches into a single detached execution.
//!
//! This crate provides [`MonoFlight`], a mechanism for deduplicating concurrent
//! async operations. When multiple tasks request the same work (identified by a
//! key), only the first request issues the fetch; every caller waits on the same
//! settlement and receives a clone of the result.
//!
//! # When to Use
//!
//! Use `MonoFlight` in front of expensive or rate-limited operations that may be
//! requested concurrently with the same parameters:
//!
//! - **Cache population**: Prevent thundering herd on a cold or expired entry
//! - **API calls**: Deduplicate concurrent requests to the same endpoint
//! - **File I/O**: Avoid reading the same file multiple times concurrently
//!
//! # Example
//!
//! ```
//! use monoflight::MonoFlight;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let group: MonoFlight<String, String> = MonoFlight::new();
//!
//! // Concurrent calls with the same key share a single execution.
//! let result = group
//!     .work(&"user:123".to_string(), || async {
//!         // This expensive operation runs only once, even if called concurrently.
//!         "expensive_result".to_string()
//!     })
//!     .await;
//! assert_eq!(result, "expensive_result");
//! # }
//! ```
//!
//! # Run-to-Completion
//!
//! The fetch is spawned as a detached tokio task. Once issued it runs to
//! completion and notifies every registered waiter, even if some (or all)
//! callers stop awaiting: a caller can discard interest in the result but
//! cannot abort the underlying work. Calling [`MonoFlight::work`] therefore
//! requires an ambient tokio runtime.
//!
//! # Thread Safety
//!
//! [`MonoFlight`] is `Send` and `Sync` and can be shared across threads. The
//! table guarding in-flight keys is locked for both registration and
//! settlement, so a settle/register race can neither drop a waiter nor issue a
//! duplicate fetch.

use std::{
    collections::{HashMap, hash_map::Entry},
    hash::Hash,
    sync::Arc,
};

use parking_lot::Mutex;
use tokio::sync::oneshot;

type WaiterTable<K, T> = Arc<Mutex<HashMap<K, Vec<oneshot::Sender<T>>>>>;

/// Represents a class of work and creates a space in which units of work can be
/// executed with duplicate suppression.
///
/// Each key moves through a small state machine: idle, then in-flight while a
/// fetch is outstanding, then idle again once the fetch settles and every
/// waiter has been notified.
pub struct MonoFlight<K, T> {
    waiters: WaiterTable<K, T>,
}

impl<K, T> Default for MonoFlight<K, T> {
    fn default() -> Self {
        Self {
            waiters: Arc::default(),
        }
    }
}

impl<K, T> std::fmt::Debug for MonoFlight<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonoFlight").finish_non_exhaustive()
    }
}

impl<K, T> MonoFlight<K, T>
where
    K: Clone + Eq + Hash + Send + 'static,
    T: Clone + Send + 'static,
{
    /// Creates a new `MonoFlight` instance.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys with an outstanding fetch.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.waiters.lock().len()
    }

    /// Executes the work for a key, suppressing duplicates.
    ///
    /// The closure is invoked to build the future, but the work only runs if
    /// this caller is the first one in for the key; later callers' futures are
    /// dropped unpolled. The fetch runs in a detached task and delivers a
    /// clone of its result to every caller registered before settlement. A
    /// caller arriving after settlement starts a fresh fetch.
    ///
    /// # Panics
    ///
    /// Panics if the detached fetch task panicked, since the settlement that
    /// would notify this caller can then never arrive.
    pub async fn work<F, Fut>(&self, key: &K, func: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let work = func();
        let (tx, rx) = oneshot::channel();

        let is_leader = {
            let mut table = self.waiters.lock();
            match table.entry(key.clone()) {
                Entry::Occupied(mut entry) => {
                    entry.get_mut().push(tx);
                    false
                }
                Entry::Vacant(entry) => {
                    entry.insert(vec![tx]);
                    true
                }
            }
        };

        if is_leader {
            let table = Arc::clone(&self.waiters);
            let key = key.clone();
            tokio::spawn(async move {
                let result = work.await;
                // Removing the entry and draining its waiters under one lock
                // acquisition keeps settlement atomic with registration.
                let waiters = table.lock().remove(&key).unwrap_or_default();
                for waiter in waiters {
                    // A waiter that lost interest dropped its receiver.
                    let _ = waiter.send(result.clone());
                }
            });
        }

        rx.await.expect("in-flight fetch settled without notifying its waiters")
    }
}
