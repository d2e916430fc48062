// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reversible transformers and their composition.
//!
//! A [`Transformer`] is a best-effort reversible mapping between two types,
//! used to adapt the key or value type of a cache pipeline. Transformers chain
//! with [`Transformer::compose`] or the `>>` operator; the inverse direction of
//! a chain runs in reverse order.

use std::sync::Arc;

type TransformFn<A, B> = Arc<dyn Fn(A) -> Option<B> + Send + Sync>;

/// A best-effort reversible mapping between two types.
///
/// Neither direction is required to be a true inverse of the other; each
/// direction simply declines by returning `None` when the input does not
/// convert. Transformers hold no mutable state and clone cheaply.
///
/// # Examples
///
/// ```
/// use strata::Transformer;
///
/// let parse: Transformer<String, i32> =
///     Transformer::new(|s: String| s.parse().ok(), |n: i32| Some(n.to_string()));
///
/// assert_eq!(parse.forward("42".to_string()), Some(42));
/// assert_eq!(parse.forward("nope".to_string()), None);
/// assert_eq!(parse.backward(42), Some("42".to_string()));
/// ```
pub struct Transformer<A, B> {
    forward: TransformFn<A, B>,
    backward: TransformFn<B, A>,
}

impl<A, B> Clone for Transformer<A, B> {
    fn clone(&self) -> Self {
        Self {
            forward: Arc::clone(&self.forward),
            backward: Arc::clone(&self.backward),
        }
    }
}

impl<A, B> std::fmt::Debug for Transformer<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}

impl<A, B> Transformer<A, B>
where
    A: 'static,
    B: 'static,
{
    /// Creates a transformer from a forward and a backward function.
    pub fn new<F, G>(forward: F, backward: G) -> Self
    where
        F: Fn(A) -> Option<B> + Send + Sync + 'static,
        G: Fn(B) -> Option<A> + Send + Sync + 'static,
    {
        Self {
            forward: Arc::new(forward),
            backward: Arc::new(backward),
        }
    }

    /// Applies the forward direction.
    #[must_use]
    pub fn forward(&self, input: A) -> Option<B> {
        (self.forward)(input)
    }

    /// Applies the backward direction.
    #[must_use]
    pub fn backward(&self, output: B) -> Option<A> {
        (self.backward)(output)
    }

    /// Chains this transformer with another one.
    ///
    /// The composite's forward direction applies `self` then `other`; the
    /// backward direction applies `other` then `self`. Either step returning
    /// `None` makes the composite return `None` with no partial result.
    ///
    /// The `>>` operator produces the same composite:
    ///
    /// ```
    /// use strata::Transformer;
    ///
    /// let double: Transformer<i32, i32> = Transformer::new(|n| Some(n * 2), |n: i32| Some(n / 2));
    /// let show: Transformer<i32, String> =
    ///     Transformer::new(|n: i32| Some(n.to_string()), |s: String| s.parse().ok());
    ///
    /// let composed = double >> show;
    /// assert_eq!(composed.forward(21), Some("42".to_string()));
    /// assert_eq!(composed.backward("42".to_string()), Some(21));
    /// ```
    #[must_use]
    pub fn compose<C>(&self, other: &Transformer<B, C>) -> Transformer<A, C>
    where
        C: 'static,
    {
        let forward_first = Arc::clone(&self.forward);
        let forward_second = Arc::clone(&other.forward);
        let backward_first = Arc::clone(&self.backward);
        let backward_second = Arc::clone(&other.backward);

        Transformer {
            forward: Arc::new(move |input| forward_first(input).and_then(|mid| forward_second(mid))),
            backward: Arc::new(move |output| backward_second(output).and_then(|mid| backward_first(mid))),
        }
    }

    /// Swaps the two directions.
    #[must_use]
    pub fn invert(&self) -> Transformer<B, A> {
        Transformer {
            forward: Arc::clone(&self.backward),
            backward: Arc::clone(&self.forward),
        }
    }
}

/// `t1 >> t2` chains two transformers, equivalent to `t1.compose(&t2)`.
impl<A, B, C> std::ops::Shr<Transformer<B, C>> for Transformer<A, B>
where
    A: 'static,
    B: 'static,
    C: 'static,
{
    type Output = Transformer<A, C>;

    fn shr(self, other: Transformer<B, C>) -> Self::Output {
        self.compose(&other)
    }
}

/// Stock transformers for common adapter boundaries.
pub mod transformers {
    use super::Transformer;

    /// A transformer that passes values through unchanged in both directions.
    #[must_use]
    pub fn identity<A: 'static>() -> Transformer<A, A> {
        Transformer::new(Some, Some)
    }

    /// Bytes to UTF-8 string, and back.
    ///
    /// The forward direction declines on invalid UTF-8.
    #[must_use]
    pub fn utf8() -> Transformer<Vec<u8>, String> {
        Transformer::new(|bytes| String::from_utf8(bytes).ok(), |text: String| Some(text.into_bytes()))
    }

    /// JSON bytes to a typed value, and back.
    ///
    /// Either direction declines when serialization fails, so an undecodable
    /// payload behaves like an absent value at an adapter boundary.
    #[must_use]
    pub fn json<T>() -> Transformer<Vec<u8>, T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + 'static,
    {
        Transformer::new(
            |bytes: Vec<u8>| serde_json::from_slice(&bytes).ok(),
            |value: T| serde_json::to_vec(&value).ok(),
        )
    }
}
