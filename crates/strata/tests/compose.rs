// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for two-level composition behavior.
//!
//! Note: Tests for internal behavior (the detached write-back task itself)
//! are in the unit tests in `src/compose.rs`.

use strata::{CacheLevel, CacheLevelExt};
use strata_level::testing::{LevelOp, MockLevel};

async fn settled<K, V>(level: &MockLevel<K, V>, key: &K)
where
    K: Clone + Eq + std::hash::Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    for _ in 0..64 {
        if level.contains_key(key) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("write-back never landed");
}

#[tokio::test]
async fn miss_in_first_falls_through_and_fills_first() {
    let first = MockLevel::<String, String>::new();
    let second = MockLevel::<String, String>::new();
    second.set(&"key".to_string(), "value".to_string()).await;

    let cache = first.clone().compose(second.clone());

    let result = cache.get(&"key".to_string()).await.expect("get failed");
    assert_eq!(result, "value");

    settled(&first, &"key".to_string()).await;
    assert_eq!(first.value(&"key".to_string()), Some("value".to_string()));
}

#[tokio::test]
async fn hit_in_first_never_consults_second() {
    let first = MockLevel::<String, String>::new();
    let second = MockLevel::<String, String>::new();
    first.set(&"key".to_string(), "near".to_string()).await;
    second.set(&"key".to_string(), "far".to_string()).await;
    second.clear_operations();

    let cache = first.compose(second.clone());

    let result = cache.get(&"key".to_string()).await.expect("get failed");
    assert_eq!(result, "near");
    assert_eq!(second.get_count(), 0);
}

#[tokio::test]
async fn miss_in_both_reports_not_found() {
    let first = MockLevel::<String, String>::new();
    let second = MockLevel::<String, String>::new();

    let cache = first.compose(second);

    let err = cache.get(&"missing".to_string()).await.expect_err("expected a miss");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn second_level_failure_is_the_one_surfaced() {
    let first = MockLevel::<String, String>::new();
    let second = MockLevel::<String, String>::new();
    second.fail_when(|op| matches!(op, LevelOp::Get(_)));

    let cache = first.compose(second);

    // The first level's NotFound is routine fall-through; the composite
    // surfaces the second level's (more specific) failure instead.
    let err = cache.get(&"key".to_string()).await.expect_err("expected failure");
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn set_writes_through_to_both_levels() {
    let first = MockLevel::<String, String>::new();
    let second = MockLevel::<String, String>::new();

    let cache = first.clone().compose(second.clone());
    cache.set(&"key".to_string(), "value".to_string()).await;

    assert_eq!(first.value(&"key".to_string()), Some("value".to_string()));
    assert_eq!(second.value(&"key".to_string()), Some("value".to_string()));
}

#[tokio::test]
async fn failing_set_in_one_level_is_unobservable() {
    let first = MockLevel::<String, String>::new();
    let second = MockLevel::<String, String>::new();
    first.fail_when(|op| matches!(op, LevelOp::Set { .. }));

    let cache = first.clone().compose(second.clone());

    // set has no result channel; the failure cannot surface anywhere.
    cache.set(&"key".to_string(), "value".to_string()).await;

    assert_eq!(first.value(&"key".to_string()), None);
    assert_eq!(second.value(&"key".to_string()), Some("value".to_string()));
}

#[tokio::test]
async fn clear_fans_out_to_both_levels() {
    let first = MockLevel::<String, String>::new();
    let second = MockLevel::<String, String>::new();

    let cache = first.clone().compose(second.clone());
    cache.set(&"key".to_string(), "value".to_string()).await;

    cache.clear().await;

    assert_eq!(first.entry_count(), 0);
    assert_eq!(second.entry_count(), 0);
}

#[tokio::test]
async fn memory_pressure_fans_out_to_both_levels() {
    let first = MockLevel::<String, String>::new();
    let second = MockLevel::<String, String>::new();

    let cache = first.clone().compose(second.clone());
    cache.on_memory_pressure().await;

    assert!(first.operations().contains(&LevelOp::MemoryPressure));
    assert!(second.operations().contains(&LevelOp::MemoryPressure));
}

#[tokio::test]
async fn a_shared_level_serves_two_pipelines() {
    use std::sync::Arc;

    let shared = Arc::new(MockLevel::<String, String>::new());
    let second_a = MockLevel::<String, String>::new();
    let second_b = MockLevel::<String, String>::new();

    let pipeline_a = Arc::clone(&shared).compose(second_a);
    let pipeline_b = Arc::clone(&shared).compose(second_b);

    pipeline_a.set(&"key".to_string(), "value".to_string()).await;

    // The shared first level was filled through pipeline A, so pipeline B
    // hits without consulting its own second level.
    let result = pipeline_b.get(&"key".to_string()).await.expect("get failed");
    assert_eq!(result, "value");
}
