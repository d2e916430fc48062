// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache level operations.

use std::sync::Arc;

/// An error from a cache level fetch.
///
/// The taxonomy is deliberately small: a miss, a conversion failure at an
/// adapter boundary, or a wrapped failure from whatever backs the level. A
/// composed pipeline surfaces only the failure of the last level it actually
/// consulted; upper-level misses are routine fall-through, not errors.
///
/// The type is `Clone` because a coalesced fetch delivers the same outcome to
/// every waiter.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// The key is absent at this level.
    #[error("no value for this key at this level")]
    NotFound,

    /// A key or value could not be converted at an adapter boundary.
    ///
    /// A value that cannot be decoded is treated as absent, not as a
    /// different kind of success.
    #[error("key or value could not be transformed at an adapter boundary")]
    TransformationFailed,

    /// The level's backing fetch failed.
    #[error("upstream fetch failed: {0}")]
    Upstream(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps an arbitrary failure from a level's backing store or fetcher.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_level::Error;
    ///
    /// let error = Error::upstream("connection reset");
    /// assert!(!error.is_not_found());
    /// ```
    pub fn upstream(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Upstream(Arc::from(cause.into()))
    }

    /// Returns `true` if this error reports a plain miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// A specialized [`Result`] type for cache level operations.
pub type Result<T> = std::result::Result<T, Error>;
