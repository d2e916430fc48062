// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for key and value transformation adapters.

use serde::{Deserialize, Serialize};
use strata::{CacheLevel, CacheLevelExt, Transformer, transformers};
use strata_level::testing::{LevelOp, MockLevel};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Profile {
    name: String,
    age: u32,
}

#[tokio::test]
async fn value_adapter_round_trips_through_json() {
    let store = MockLevel::<String, Vec<u8>>::new();
    let cache = store.map_values(transformers::json::<Profile>());

    let profile = Profile {
        name: "ada".to_string(),
        age: 36,
    };

    cache.set(&"p:1".to_string(), profile.clone()).await;
    let fetched = cache.get(&"p:1".to_string()).await.expect("get failed");

    assert_eq!(fetched, profile);
}

#[tokio::test]
async fn undecodable_value_is_a_transformation_failure() {
    let store = MockLevel::<String, Vec<u8>>::new();
    store.set(&"p:1".to_string(), b"not json at all".to_vec()).await;

    let cache = store.map_values(transformers::json::<Profile>());

    // The wrapped fetch succeeded, but the value does not decode: the adapter
    // treats it as absent rather than as a different kind of success.
    let err = cache.get(&"p:1".to_string()).await.expect_err("expected failure");
    assert!(matches!(err, strata::Error::TransformationFailed));
}

#[tokio::test]
async fn unencodable_value_drops_the_write_silently() {
    let store = MockLevel::<String, Vec<u8>>::new();
    let refuse_encode: Transformer<Vec<u8>, i32> =
        Transformer::new(|bytes: Vec<u8>| String::from_utf8(bytes).ok().and_then(|s| s.parse().ok()), |_| None);

    let cache = store.clone().map_values(refuse_encode);

    // set has no result channel, so the drop is unobservable by design.
    cache.set(&"k".to_string(), 42).await;

    assert_eq!(store.entry_count(), 0);
    assert!(!store.operations().iter().any(|op| matches!(op, LevelOp::Set { .. })));
}

#[tokio::test]
async fn key_adapter_translates_external_keys() {
    let store = MockLevel::<String, String>::new();
    let id_keys: Transformer<u32, String> = Transformer::new(
        |id| Some(format!("id:{id}")),
        |raw: String| raw.strip_prefix("id:").and_then(|rest| rest.parse().ok()),
    );

    let cache = store.clone().map_keys(id_keys);

    cache.set(&7, "value".to_string()).await;
    assert_eq!(cache.get(&7).await.expect("get failed"), "value".to_string());

    // The wrapped level only ever saw the internal key type.
    assert_eq!(store.value(&"id:7".to_string()), Some("value".to_string()));
}

#[tokio::test]
async fn untranslatable_key_never_touches_the_wrapped_level() {
    let store = MockLevel::<String, String>::new();
    let even_only: Transformer<u32, String> =
        Transformer::new(|id| (id % 2 == 0).then(|| format!("id:{id}")), |_| None);

    let cache = store.clone().map_keys(even_only);

    let err = cache.get(&3).await.expect_err("expected failure");
    assert!(matches!(err, strata::Error::TransformationFailed));

    cache.set(&5, "value".to_string()).await;

    assert!(store.operations().is_empty());
}

#[tokio::test]
async fn chained_transformers_adapt_a_composed_pipeline() {
    let first = MockLevel::<String, Vec<u8>>::new();
    let second = MockLevel::<String, Vec<u8>>::new();
    second.set(&"key".to_string(), b"\"hello\"".to_vec()).await;

    // bytes -> String via JSON, then String -> uppercase presentation.
    let shout: Transformer<String, String> =
        Transformer::new(|s: String| Some(s.to_uppercase()), |s: String| Some(s.to_lowercase()));
    let chain = transformers::json::<String>() >> shout;

    let cache = first.clone().compose(second).map_values(chain);

    let result = cache.get(&"key".to_string()).await.expect("get failed");
    assert_eq!(result, "HELLO".to_string());
}
