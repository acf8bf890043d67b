//! Control plane, leaderboards, stores, vector indexes, webhooks and
//! transport failures through the client

mod common;

use common::{client_with, init_tracing, setup, CACHE, DEFAULT_TTL};
use ouroboros_cache::{
    CacheClientConfig, CacheFlush, CacheGet, CreateCache, CreateStore, CreateVectorIndex,
    DeleteCache, ErrorCode, LeaderboardFetchByScoreOptions, MetadataSelection, MetadataValue,
    OperationRecord, Outcome, OutcomeListener, SearchOptions, SimilarityMetric, SortOrder,
    StoreGet, StoreValue, TransportFailure, TransportStatus, VectorItem, Webhook,
};
use ouroboros_cache_engine::LocalTransport;
use parking_lot::Mutex;
use std::sync::Arc;

fn code_of<O: Outcome>(outcome: &O) -> Option<ErrorCode> {
    outcome.error().map(|e| e.code())
}

#[tokio::test]
async fn test_cache_control_plane() {
    let (client, _) = setup().await;

    assert_eq!(client.create_cache(CACHE).await, CreateCache::AlreadyExists);
    assert_eq!(client.create_cache("other").await, CreateCache::Success);

    let names: Vec<String> = client
        .list_caches()
        .await
        .caches()
        .unwrap_or_default()
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(names, vec!["other".to_string(), CACHE.to_string()]);

    client.set(CACHE, "k", "v", None).await;
    assert_eq!(client.flush_cache(CACHE).await, CacheFlush::Success);
    assert_eq!(client.get(CACHE, "k").await, CacheGet::Miss);

    assert_eq!(client.delete_cache("other").await, DeleteCache::Success);
    assert_eq!(code_of(&client.delete_cache("other").await), Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn test_data_operation_on_missing_cache_is_not_found() {
    let (client, _) = setup().await;
    assert_eq!(code_of(&client.get("missing", "k").await), Some(ErrorCode::NotFound));
    assert_eq!(
        code_of(&client.set_add_element("missing", "s", "x", Default::default()).await),
        Some(ErrorCode::NotFound)
    );
    assert!(client.get("missing", "k").await.into_result().is_err());
}

#[tokio::test]
async fn test_leaderboard() {
    let (client, _) = setup().await;
    let board = client.leaderboard(CACHE, "scores");

    let empty = board.fetch_by_rank(0, 10, SortOrder::Ascending).await;
    assert_eq!(empty.values().map(|v| v.len()), Some(0));
    assert_eq!(board.length().await.length(), Some(0));

    board.upsert([(1, 10.0), (2, 20.0), (3, 30.0)]).await;
    assert_eq!(board.length().await.length(), Some(3));

    let top = board.fetch_by_rank(0, 10, SortOrder::Descending).await;
    let ranked: Vec<(u64, u64)> = top
        .values()
        .unwrap_or_default()
        .iter()
        .map(|e| (e.id, e.rank))
        .collect();
    assert_eq!(ranked, vec![(3, 0), (2, 1), (1, 2)]);

    let by_score = board
        .fetch_by_score(LeaderboardFetchByScoreOptions::default().min_score(15.0))
        .await;
    let ids: Vec<u64> = by_score.values().unwrap_or_default().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 3]);

    let ranks = board.get_rank([2, 99], SortOrder::Ascending).await;
    let ranks = ranks.values().unwrap_or_default();
    assert_eq!(ranks.len(), 1);
    assert_eq!((ranks[0].id, ranks[0].rank), (2, 1));

    board.remove_elements([1]).await;
    assert_eq!(board.length().await.length(), Some(2));

    board.delete().await;
    assert_eq!(board.length().await.length(), Some(0));
}

#[tokio::test]
async fn test_store() {
    let (client, _) = setup().await;
    let stores = client.store_client();

    assert_eq!(stores.create_store("store").await, CreateStore::Success);
    assert_eq!(stores.create_store("store").await, CreateStore::AlreadyExists);

    stores.put_int("store", "n", 7).await;
    stores.put_string("store", "s", "text").await;
    stores.put("store", "d", StoreValue::Double(1.5)).await;

    assert_eq!(stores.get("store", "n").await.value().and_then(StoreValue::as_int), Some(7));
    assert_eq!(
        stores.get("store", "s").await.value().and_then(StoreValue::as_str),
        Some("text")
    );
    assert_eq!(stores.get("store", "missing").await, StoreGet::NotFound);

    stores.delete("store", "n").await;
    assert_eq!(stores.get("store", "n").await, StoreGet::NotFound);

    assert_eq!(
        code_of(&stores.get("nope", "n").await),
        Some(ErrorCode::StoreNotFound)
    );
    assert_eq!(stores.list_stores().await.stores().map(|s| s.len()), Some(1));

    stores.delete_store("store").await;
    assert_eq!(
        code_of(&stores.delete_store("store").await),
        Some(ErrorCode::StoreNotFound)
    );
}

#[tokio::test]
async fn test_vector_index() {
    let (client, _) = setup().await;
    let vectors = client.vector_index_client();

    assert_eq!(
        vectors.create_index("idx", 2, SimilarityMetric::InnerProduct).await,
        CreateVectorIndex::Success
    );
    assert_eq!(
        vectors.create_index("idx", 2, SimilarityMetric::InnerProduct).await,
        CreateVectorIndex::AlreadyExists
    );

    vectors
        .upsert_item_batch(
            "idx",
            [
                VectorItem::new("a", vec![1.0, 0.0])
                    .with_metadata("genre", MetadataValue::String("jazz".into())),
                VectorItem::new("b", vec![0.0, 1.0]),
                VectorItem::new("c", vec![1.0, 1.0]),
            ],
        )
        .await;
    assert_eq!(vectors.count_items("idx").await.item_count(), Some(3));

    let options = SearchOptions::default()
        .top_k(2)
        .metadata_fields(MetadataSelection::All);
    let search = vectors.search("idx", vec![1.0, 0.5], options.clone()).await;
    let hits = search.hits().unwrap_or_default();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);
    assert!(hits[1].metadata.contains_key("genre"));
    assert!(hits[0].vector.is_none());

    let fetched = vectors
        .search_and_fetch_vectors("idx", vec![1.0, 0.5], options)
        .await;
    assert_eq!(
        fetched.hits().unwrap_or_default()[0].vector.as_deref(),
        Some(&[1.0, 1.0][..])
    );

    let items = vectors.get_item_batch("idx", ["a", "zzz"]).await;
    let items = items.values().cloned().unwrap_or_default();
    assert_eq!(items.len(), 1);
    assert_eq!(items["a"].vector, vec![1.0, 0.0]);

    let metadata = vectors.get_item_metadata_batch("idx", ["a"]).await;
    assert!(metadata.values().is_some_and(|m| m["a"].contains_key("genre")));

    let mismatch = vectors.search("idx", vec![1.0], SearchOptions::default()).await;
    assert_eq!(code_of(&mismatch), Some(ErrorCode::InvalidArgument));

    vectors.delete_item_batch("idx", ["a", "b"]).await;
    assert_eq!(vectors.count_items("idx").await.item_count(), Some(1));

    vectors.delete_index("idx").await;
    assert_eq!(code_of(&vectors.count_items("idx").await), Some(ErrorCode::NotFound));
    assert_eq!(vectors.list_indexes().await.indexes().map(|s| s.len()), Some(0));
}

#[tokio::test]
async fn test_webhooks() {
    let (client, _) = setup().await;
    let webhooks = client.webhook_client();
    let webhook = Webhook {
        cache_name: CACHE.to_string(),
        name: "hook".to_string(),
        topic_name: "events".to_string(),
        destination: "https://example.com/hook".to_string(),
    };

    let put = webhooks.put_webhook(webhook.clone()).await;
    let secret = put.secret().map(str::to_string).expect("put returns the secret");
    assert_eq!(
        webhooks.get_webhook_secret(CACHE, "hook").await.secret(),
        Some(secret.as_str())
    );
    assert_eq!(
        webhooks.list_webhooks(CACHE).await.webhooks(),
        Some(&[webhook][..])
    );

    let rotated = webhooks.rotate_webhook_secret(CACHE, "hook").await;
    assert!(rotated.secret().is_some_and(|s| s != secret));

    webhooks.delete_webhook(CACHE, "hook").await;
    assert_eq!(
        code_of(&webhooks.get_webhook_secret(CACHE, "hook").await),
        Some(ErrorCode::NotFound)
    );
}

#[tokio::test]
async fn test_transport_failures_are_classified() {
    let (client, transport) = setup().await;
    client.set(CACHE, "k", "v", None).await;

    transport.fail_next(TransportFailure::timeout("deadline exceeded"));
    transport.fail_next(TransportFailure::new(TransportStatus::Unavailable, "down"));

    let timed_out = client.get(CACHE, "k").await;
    assert_eq!(code_of(&timed_out), Some(ErrorCode::Timeout));
    assert!(timed_out
        .error()
        .and_then(|e| e.transport_failure())
        .is_some());
    assert_eq!(
        code_of(&client.get(CACHE, "k").await),
        Some(ErrorCode::ServerUnavailable)
    );
    assert_eq!(client.get(CACHE, "k").await.value().as_deref(), Some("v"));
}

#[derive(Default)]
struct Recorder(Mutex<Vec<OperationRecord>>);

impl OutcomeListener for Recorder {
    fn on_outcome(&self, record: &OperationRecord) {
        self.0.lock().push(record.clone());
    }
}

#[tokio::test]
async fn test_listeners_see_every_outcome() {
    init_tracing();
    let recorder = Arc::new(Recorder::default());
    let config = CacheClientConfig::new(DEFAULT_TTL).listener(recorder.clone());
    let client = client_with(LocalTransport::default(), config);

    client.create_cache(CACHE).await;
    client.get(CACHE, "k").await;
    client.get("", "k").await;

    let tags: Vec<(&str, &str)> = recorder
        .0
        .lock()
        .iter()
        .map(|r| (r.operation, r.tag))
        .collect();
    assert_eq!(
        tags,
        vec![("create_cache", "Success"), ("get", "Miss"), ("get", "Error")]
    );
}
