//! Scalar, conditional-write and item TTL operations through the client

mod common;

use common::{setup, CACHE};
use ouroboros_cache::{
    CacheAdjustTtl, CacheDelete, CacheGet, CacheGetBatch, CacheSet, CacheSetIf, CacheUpdateTtl,
    ErrorCode, ItemType, Outcome,
};
use std::time::Duration;

#[tokio::test]
async fn test_get_unwritten_key_is_miss() {
    let (client, _) = setup().await;
    let outcome = client.get(CACHE, "never-written").await;
    assert_eq!(outcome, CacheGet::Miss);
    assert_eq!(outcome.value(), None);
}

#[tokio::test]
async fn test_set_get_round_trip_text_and_bytes() {
    let (client, _) = setup().await;

    assert_eq!(client.set(CACHE, "text", "hello", None).await, CacheSet::Success);
    assert_eq!(client.get(CACHE, b"text".to_vec()).await.value().as_deref(), Some("hello"));

    let raw = vec![0u8, 159, 146, 150];
    assert_eq!(client.set(CACHE, b"raw".to_vec(), raw.clone(), None).await, CacheSet::Success);
    assert_eq!(client.get(CACHE, "raw").await.value_bytes(), Some(raw.as_slice()));
}

#[tokio::test]
async fn test_delete() {
    let (client, _) = setup().await;
    client.set(CACHE, "k", "v", None).await;
    assert_eq!(client.delete(CACHE, "k").await, CacheDelete::Success);
    assert_eq!(client.get(CACHE, "k").await, CacheGet::Miss);
    // deleting an absent key is not an error
    assert_eq!(client.delete(CACHE, "k").await, CacheDelete::Success);
}

#[tokio::test]
async fn test_set_if_absent_keeps_existing_value() {
    let (client, _) = setup().await;
    client.set(CACHE, "k", "original", None).await;

    assert_eq!(client.set_if_absent(CACHE, "k", "other", None).await, CacheSetIf::NotStored);
    assert_eq!(client.set_if_not_exists(CACHE, "k", "other", None).await, CacheSetIf::NotStored);
    assert_eq!(client.get(CACHE, "k").await.value().as_deref(), Some("original"));

    assert_eq!(client.set_if_absent(CACHE, "fresh", "v", None).await, CacheSetIf::Stored);
    assert_eq!(client.get(CACHE, "fresh").await.value().as_deref(), Some("v"));
}

#[tokio::test]
async fn test_conditional_writes() {
    let (client, _) = setup().await;

    assert_eq!(client.set_if_present(CACHE, "k", "v1", None).await, CacheSetIf::NotStored);
    assert_eq!(client.set_if_absent_or_equal(CACHE, "k", "v1", "x", None).await, CacheSetIf::Stored);
    assert_eq!(client.set_if_present(CACHE, "k", "v2", None).await, CacheSetIf::Stored);

    assert_eq!(client.set_if_equal(CACHE, "k", "v3", "nope", None).await, CacheSetIf::NotStored);
    assert_eq!(client.set_if_equal(CACHE, "k", "v3", "v2", None).await, CacheSetIf::Stored);

    assert_eq!(client.set_if_not_equal(CACHE, "k", "v4", "v3", None).await, CacheSetIf::NotStored);
    assert_eq!(client.set_if_not_equal(CACHE, "k", "v4", "zzz", None).await, CacheSetIf::Stored);

    assert_eq!(
        client.set_if_present_and_not_equal(CACHE, "k", "v5", "v4", None).await,
        CacheSetIf::NotStored
    );
    assert_eq!(
        client.set_if_present_and_not_equal(CACHE, "k", "v5", "zzz", None).await,
        CacheSetIf::Stored
    );
    assert_eq!(
        client.set_if_present_and_not_equal(CACHE, "missing", "v", "zzz", None).await,
        CacheSetIf::NotStored
    );

    assert_eq!(client.set_if_absent_or_equal(CACHE, "k", "v6", "v4", None).await, CacheSetIf::NotStored);
    assert_eq!(client.set_if_absent_or_equal(CACHE, "k", "v6", "v5", None).await, CacheSetIf::Stored);
    assert_eq!(client.get(CACHE, "k").await.value().as_deref(), Some("v6"));
}

#[tokio::test]
async fn test_increment() {
    let (client, _) = setup().await;

    assert_eq!(client.increment(CACHE, "counter", 1, None).await.value(), Some(1));
    assert_eq!(client.increment(CACHE, "counter", 41, None).await.value(), Some(42));
    assert_eq!(client.decrement(CACHE, "counter", 2, None).await.value(), Some(40));
    assert_eq!(client.get(CACHE, "counter").await.value().as_deref(), Some("40"));

    client.set(CACHE, "text", "abcxyz", None).await;
    let outcome = client.increment(CACHE, "text", 1, None).await;
    assert_eq!(outcome.error().map(|e| e.code()), Some(ErrorCode::FailedPrecondition));
}

#[tokio::test]
async fn test_get_batch_is_index_aligned() {
    let (client, _) = setup().await;
    let outcome = client
        .set_batch(CACHE, [("a", "1"), ("c", "3"), ("e", "5")], None)
        .await;
    assert_eq!(outcome.results().map(|r| r.len()), Some(3));

    let keys = ["a", "b", "c", "d", "e", "f"];
    let batch = client.get_batch(CACHE, keys).await;
    let CacheGetBatch::Success(results) = &batch else {
        panic!("unexpected {batch:?}");
    };
    let values: Vec<Option<String>> = results.results().iter().map(CacheGet::value).collect();
    assert_eq!(
        values,
        vec![
            Some("1".to_string()),
            None,
            Some("3".to_string()),
            None,
            Some("5".to_string()),
            None
        ]
    );
    assert_eq!(results.values().len(), 3);
    assert_eq!(results.values().get("c").map(String::as_str), Some("3"));
}

#[tokio::test]
async fn test_key_existence_and_type() {
    let (client, _) = setup().await;
    client.set(CACHE, "scalar", "v", None).await;
    client
        .set_add_element(CACHE, "set", "x", Default::default())
        .await;

    assert_eq!(client.key_exists(CACHE, "scalar").await.exists(), Some(true));
    assert_eq!(
        client.keys_exist(CACHE, ["scalar", "nope", "set"]).await.exists(),
        Some(&[true, false, true][..])
    );
    assert_eq!(client.item_get_type(CACHE, "scalar").await.item_type(), Some(ItemType::Scalar));
    assert_eq!(client.item_get_type(CACHE, "set").await.item_type(), Some(ItemType::Set));
    assert_eq!(client.item_get_type(CACHE, "nope").await.item_type(), None);
}

#[tokio::test(start_paused = true)]
async fn test_item_ttl_management() {
    let (client, _) = setup().await;
    client.set(CACHE, "k", "v", Some(60.0)).await;
    assert_eq!(
        client.item_get_ttl(CACHE, "k").await.remaining_ttl(),
        Some(Duration::from_secs(60))
    );

    assert_eq!(client.increase_ttl(CACHE, "k", 30.0).await, CacheAdjustTtl::NotSet);
    assert_eq!(client.increase_ttl(CACHE, "k", 120.0).await, CacheAdjustTtl::Set);
    assert_eq!(client.decrease_ttl(CACHE, "k", 300.0).await, CacheAdjustTtl::NotSet);
    assert_eq!(client.decrease_ttl(CACHE, "k", 10.0).await, CacheAdjustTtl::Set);
    assert_eq!(
        client.item_get_ttl(CACHE, "k").await.remaining_ttl(),
        Some(Duration::from_secs(10))
    );

    assert_eq!(client.update_ttl(CACHE, "k", 5.0).await, CacheUpdateTtl::Set);
    tokio::time::advance(Duration::from_secs(6)).await;
    assert_eq!(client.get(CACHE, "k").await, CacheGet::Miss);

    assert_eq!(client.update_ttl(CACHE, "k", 5.0).await, CacheUpdateTtl::Miss);
    assert_eq!(client.increase_ttl(CACHE, "k", 5.0).await, CacheAdjustTtl::Miss);
    assert_eq!(client.item_get_ttl(CACHE, "k").await.remaining_ttl(), None);
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_the_engine() {
    let (client, _) = setup().await;

    let outcome = client.set(CACHE, "k", "v", Some(-1.0)).await;
    assert_eq!(outcome.error().map(|e| e.code()), Some(ErrorCode::InvalidArgument));

    let outcome = client.get("  ", "k").await;
    assert_eq!(outcome.error().map(|e| e.code()), Some(ErrorCode::InvalidArgument));
    assert!(outcome.into_result().is_err());
}
