//! Scalar, conditional-write, batch and item-introspection operations

use super::CacheClient;
use crate::error::SdkError;
use crate::request::{CacheCommand, Payload, Request, SetCondition};
use crate::responses::{
    CacheAdjustTtl, CacheDelete, CacheGet, CacheGetBatch, CacheIncrement, CacheItemGetTtl,
    CacheItemGetType, CacheKeyExists, CacheKeysExist, CacheSet, CacheSetBatch, CacheSetIf,
    CacheUpdateTtl, GetBatchResults, Outcome,
};
use crate::ttl::{resolve_item_ttl, validate_ttl_seconds};
use crate::types::{ByteLike, CacheValue};
use crate::validation::{validate_cache_name, validate_key, validate_keys};
use futures::stream::{self, StreamExt};

impl CacheClient {
    pub async fn get(&self, cache_name: &str, key: impl Into<ByteLike>) -> CacheGet {
        let key = key.into();
        self.dispatcher
            .call(
                "get",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::Get {
                            key: key.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Value(v) => Some(CacheGet::Hit(CacheValue::new(v))),
                    Payload::Miss => Some(CacheGet::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Store `value` under `key`. `ttl_seconds` defaults to the client's TTL.
    pub async fn set(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        ttl_seconds: Option<f64>,
    ) -> CacheSet {
        let (key, value) = (key.into(), value.into());
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                "set",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    let ttl = resolve_item_ttl(ttl_seconds, default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::Set {
                            key: key.into_bytes(),
                            value: value.into_bytes(),
                            ttl,
                        },
                    ))
                },
                |payload| matches!(payload, Payload::Unit).then_some(CacheSet::Success),
            )
            .await
    }

    pub async fn delete(&self, cache_name: &str, key: impl Into<ByteLike>) -> CacheDelete {
        let key = key.into();
        self.dispatcher
            .call(
                "delete",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::Delete {
                            key: key.into_bytes(),
                        },
                    ))
                },
                |payload| matches!(payload, Payload::Unit).then_some(CacheDelete::Success),
            )
            .await
    }

    /// Atomically add `amount` to the integer stored under `key`. A missing
    /// key counts as `0`.
    pub async fn increment(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        amount: i64,
        ttl_seconds: Option<f64>,
    ) -> CacheIncrement {
        self.increment_by("increment", cache_name, key.into(), Some(amount), ttl_seconds)
            .await
    }

    pub async fn decrement(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        amount: i64,
        ttl_seconds: Option<f64>,
    ) -> CacheIncrement {
        self.increment_by("decrement", cache_name, key.into(), amount.checked_neg(), ttl_seconds)
            .await
    }

    async fn increment_by(
        &self,
        operation: &'static str,
        cache_name: &str,
        key: ByteLike,
        amount: Option<i64>,
        ttl_seconds: Option<f64>,
    ) -> CacheIncrement {
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                operation,
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    let amount =
                        amount.ok_or_else(|| SdkError::invalid_argument("amount is out of range"))?;
                    let ttl = resolve_item_ttl(ttl_seconds, default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::Increment {
                            key: key.into_bytes(),
                            amount,
                            ttl,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Integer(n) => Some(CacheIncrement::Success(n)),
                    _ => None,
                },
            )
            .await
    }

    pub async fn set_if_absent(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetIf {
        self.set_if("set_if_absent", cache_name, key.into(), value.into(), SetCondition::Absent, ttl_seconds)
            .await
    }

    /// Same contract as [`CacheClient::set_if_absent`].
    pub async fn set_if_not_exists(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetIf {
        self.set_if("set_if_not_exists", cache_name, key.into(), value.into(), SetCondition::Absent, ttl_seconds)
            .await
    }

    pub async fn set_if_present(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetIf {
        self.set_if("set_if_present", cache_name, key.into(), value.into(), SetCondition::Present, ttl_seconds)
            .await
    }

    pub async fn set_if_equal(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        equal: impl Into<ByteLike>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetIf {
        let condition = SetCondition::Equal(equal.into().into_bytes());
        self.set_if("set_if_equal", cache_name, key.into(), value.into(), condition, ttl_seconds)
            .await
    }

    pub async fn set_if_not_equal(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        not_equal: impl Into<ByteLike>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetIf {
        let condition = SetCondition::NotEqual(not_equal.into().into_bytes());
        self.set_if("set_if_not_equal", cache_name, key.into(), value.into(), condition, ttl_seconds)
            .await
    }

    pub async fn set_if_present_and_not_equal(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        not_equal: impl Into<ByteLike>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetIf {
        let condition = SetCondition::PresentAndNotEqual(not_equal.into().into_bytes());
        self.set_if(
            "set_if_present_and_not_equal",
            cache_name,
            key.into(),
            value.into(),
            condition,
            ttl_seconds,
        )
        .await
    }

    pub async fn set_if_absent_or_equal(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        equal: impl Into<ByteLike>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetIf {
        let condition = SetCondition::AbsentOrEqual(equal.into().into_bytes());
        self.set_if(
            "set_if_absent_or_equal",
            cache_name,
            key.into(),
            value.into(),
            condition,
            ttl_seconds,
        )
        .await
    }

    async fn set_if(
        &self,
        operation: &'static str,
        cache_name: &str,
        key: ByteLike,
        value: ByteLike,
        condition: SetCondition,
        ttl_seconds: Option<f64>,
    ) -> CacheSetIf {
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                operation,
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    let ttl = resolve_item_ttl(ttl_seconds, default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SetIf {
                            key: key.into_bytes(),
                            value: value.into_bytes(),
                            condition,
                            ttl,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Flag(true) => Some(CacheSetIf::Stored),
                    Payload::Flag(false) => Some(CacheSetIf::NotStored),
                    _ => None,
                },
            )
            .await
    }

    /// Fetch several keys. Results are index-aligned with `keys`; a missing
    /// key is a `Miss` in its slot. Any failed sub-request fails the batch.
    pub async fn get_batch<K: Into<ByteLike>>(
        &self,
        cache_name: &str,
        keys: impl IntoIterator<Item = K>,
    ) -> CacheGetBatch {
        let keys: Vec<ByteLike> = keys.into_iter().map(Into::into).collect();
        let outcome = self.fan_out_get(cache_name, keys).await;
        self.dispatcher.report("get_batch", cache_name, &outcome);
        outcome
    }

    async fn fan_out_get(&self, cache_name: &str, keys: Vec<ByteLike>) -> CacheGetBatch {
        if let Err(err) = validate_cache_name(cache_name).and_then(|_| validate_keys(&keys)) {
            return CacheGetBatch::Error(err);
        }

        let window = self.config().max_batch_concurrency;
        let results: Vec<CacheGet> = stream::iter(keys.iter().cloned())
            .map(|key| self.get(cache_name, key))
            .buffered(window)
            .collect()
            .await;

        if let Some(err) = results.iter().find_map(|r| r.error()) {
            return CacheGetBatch::Error(err.clone());
        }
        let keys = keys
            .into_iter()
            .map(|k| CacheValue::new(k.into_bytes()))
            .collect();
        CacheGetBatch::Success(GetBatchResults::new(keys, results))
    }

    /// Store several key/value pairs with one TTL. Per-item results are
    /// index-aligned with `items`.
    pub async fn set_batch<K: Into<ByteLike>, V: Into<ByteLike>>(
        &self,
        cache_name: &str,
        items: impl IntoIterator<Item = (K, V)>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetBatch {
        let items: Vec<(ByteLike, ByteLike)> = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let outcome = self.fan_out_set(cache_name, items, ttl_seconds).await;
        self.dispatcher.report("set_batch", cache_name, &outcome);
        outcome
    }

    async fn fan_out_set(
        &self,
        cache_name: &str,
        items: Vec<(ByteLike, ByteLike)>,
        ttl_seconds: Option<f64>,
    ) -> CacheSetBatch {
        let default_ttl = self.config().default_ttl;
        let checked = validate_cache_name(cache_name)
            .and_then(|_| items.iter().try_for_each(|(k, _)| validate_key(k)))
            .and_then(|_| resolve_item_ttl(ttl_seconds, default_ttl).map(|_| ()));
        if let Err(err) = checked {
            return CacheSetBatch::Error(err);
        }

        let window = self.config().max_batch_concurrency;
        let results: Vec<CacheSet> = stream::iter(items)
            .map(|(key, value)| self.set(cache_name, key, value, ttl_seconds))
            .buffered(window)
            .collect()
            .await;

        match results.iter().find_map(|r| r.error()) {
            Some(err) => CacheSetBatch::Error(err.clone()),
            None => CacheSetBatch::Success(results),
        }
    }

    /// Absence is `false`, never an error.
    pub async fn key_exists(&self, cache_name: &str, key: impl Into<ByteLike>) -> CacheKeyExists {
        let key = key.into();
        self.dispatcher
            .call(
                "key_exists",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::KeysExist {
                            keys: vec![key.into_bytes()],
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Flags(flags) if flags.len() == 1 => {
                        Some(CacheKeyExists::Success(flags[0]))
                    }
                    _ => None,
                },
            )
            .await
    }

    pub async fn keys_exist<K: Into<ByteLike>>(
        &self,
        cache_name: &str,
        keys: impl IntoIterator<Item = K>,
    ) -> CacheKeysExist {
        let keys: Vec<ByteLike> = keys.into_iter().map(Into::into).collect();
        let expected = keys.len();
        self.dispatcher
            .call(
                "keys_exist",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_keys(&keys)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::KeysExist {
                            keys: keys.into_iter().map(ByteLike::into_bytes).collect(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Flags(flags) if flags.len() == expected => {
                        Some(CacheKeysExist::Success(flags))
                    }
                    _ => None,
                },
            )
            .await
    }

    pub async fn item_get_type(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
    ) -> CacheItemGetType {
        let key = key.into();
        self.dispatcher
            .call(
                "item_get_type",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::ItemGetType {
                            key: key.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::ItemType(t) => Some(CacheItemGetType::Hit(t)),
                    Payload::Miss => Some(CacheItemGetType::Miss),
                    _ => None,
                },
            )
            .await
    }

    pub async fn item_get_ttl(&self, cache_name: &str, key: impl Into<ByteLike>) -> CacheItemGetTtl {
        let key = key.into();
        self.dispatcher
            .call(
                "item_get_ttl",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::ItemGetTtl {
                            key: key.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Ttl(remaining) => Some(CacheItemGetTtl::Hit(remaining)),
                    Payload::Miss => Some(CacheItemGetTtl::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Replace the remaining TTL of an existing item.
    pub async fn update_ttl(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        ttl_seconds: f64,
    ) -> CacheUpdateTtl {
        let key = key.into();
        self.dispatcher
            .call(
                "update_ttl",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    let ttl = validate_ttl_seconds(ttl_seconds)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::UpdateTtl {
                            key: key.into_bytes(),
                            ttl,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Unit => Some(CacheUpdateTtl::Set),
                    Payload::Miss => Some(CacheUpdateTtl::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Set the TTL only if it is longer than the remaining one.
    pub async fn increase_ttl(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        ttl_seconds: f64,
    ) -> CacheAdjustTtl {
        self.adjust_ttl("increase_ttl", cache_name, key.into(), ttl_seconds, true)
            .await
    }

    /// Set the TTL only if it is shorter than the remaining one.
    pub async fn decrease_ttl(
        &self,
        cache_name: &str,
        key: impl Into<ByteLike>,
        ttl_seconds: f64,
    ) -> CacheAdjustTtl {
        self.adjust_ttl("decrease_ttl", cache_name, key.into(), ttl_seconds, false)
            .await
    }

    async fn adjust_ttl(
        &self,
        operation: &'static str,
        cache_name: &str,
        key: ByteLike,
        ttl_seconds: f64,
        increase: bool,
    ) -> CacheAdjustTtl {
        self.dispatcher
            .call(
                operation,
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_key(&key)?;
                    let ttl = validate_ttl_seconds(ttl_seconds)?;
                    let key = key.into_bytes();
                    let command = if increase {
                        CacheCommand::IncreaseTtl { key, ttl }
                    } else {
                        CacheCommand::DecreaseTtl { key, ttl }
                    };
                    Ok(Request::cache(cache_name, command))
                },
                |payload| match payload {
                    Payload::Flag(true) => Some(CacheAdjustTtl::Set),
                    Payload::Flag(false) => Some(CacheAdjustTtl::NotSet),
                    Payload::Miss => Some(CacheAdjustTtl::Miss),
                    _ => None,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::CacheClient;
    use crate::config::{CacheClientConfig, OperationRecord, OutcomeListener};
    use crate::error::ErrorCode;
    use crate::request::{CacheCommand, Payload, Request};
    use crate::responses::*;
    use crate::transport::{TransportFailure, TransportStatus};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[tokio::test]
    async fn test_set_uses_default_ttl() {
        let transport = ScriptedTransport::answering(vec![]);
        let client = client(transport.clone());
        assert_eq!(client.set("cache", "k", "v", None).await, CacheSet::Success);

        let requests = transport.requests.lock().unwrap();
        match &requests[0] {
            Request::Cache {
                command: CacheCommand::Set { ttl, .. },
                ..
            } => assert_eq!(*ttl, Duration::from_secs(60)),
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_ttl_never_reaches_transport() {
        let transport = ScriptedTransport::answering(vec![]);
        let client = client(transport.clone());

        for ttl in [-1.0, 0.0, 1.5, f64::NAN] {
            let outcome = client.set("cache", "k", "v", Some(ttl)).await;
            assert_eq!(
                outcome.error().map(|e| e.code()),
                Some(ErrorCode::InvalidArgument),
                "ttl {ttl}"
            );
        }
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_key_is_invalid() {
        let client = client(ScriptedTransport::answering(vec![]));
        let outcome = client.get("cache", "").await;
        assert_eq!(
            outcome.to_string(),
            "CacheGet::Error: Invalid argument passed to cache client: key must not be empty"
        );
    }

    #[tokio::test]
    async fn test_conditional_outcomes() {
        let transport = ScriptedTransport::answering(vec![
            Ok(Payload::Flag(true)),
            Ok(Payload::Flag(false)),
        ]);
        let client = client(transport);
        assert_eq!(
            client.set_if_absent("cache", "k", "v", None).await,
            CacheSetIf::Stored
        );
        assert_eq!(
            client.set_if_equal("cache", "k", "v", "other", None).await,
            CacheSetIf::NotStored
        );
    }

    #[tokio::test]
    async fn test_decrement_negates_amount() {
        let transport = ScriptedTransport::answering(vec![Ok(Payload::Integer(-3))]);
        let client = client(transport.clone());
        assert_eq!(client.decrement("cache", "n", 3, None).await.value(), Some(-3));

        let requests = transport.requests.lock().unwrap();
        assert!(matches!(
            &requests[0],
            Request::Cache {
                command: CacheCommand::Increment { amount: -3, .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_get_batch_fails_on_sub_request_failure() {
        let transport = ScriptedTransport::answering(vec![
            Ok(Payload::Value(b"a".to_vec())),
            Err(TransportFailure::new(TransportStatus::Unavailable, "down")),
        ]);
        let client = client(transport);
        let outcome = client.get_batch("cache", ["a", "b"]).await;
        assert_eq!(
            outcome.error().map(|e| e.code()),
            Some(ErrorCode::ServerUnavailable)
        );
    }

    #[tokio::test]
    async fn test_get_batch_rejects_blank_cache_name() {
        let transport = ScriptedTransport::answering(vec![]);
        let client = client(transport.clone());
        let outcome = client.get_batch("", ["a"]).await;
        assert!(outcome.is_error());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_keys_exist_checks_flag_count() {
        let transport = ScriptedTransport::answering(vec![Ok(Payload::Flags(vec![true]))]);
        let client = client(transport);
        let outcome = client.keys_exist("cache", ["a", "b"]).await;
        assert_eq!(outcome.error().map(|e| e.code()), Some(ErrorCode::Unknown));
    }

    #[derive(Default)]
    struct Records(Mutex<Vec<(&'static str, &'static str)>>);

    impl OutcomeListener for Records {
        fn on_outcome(&self, record: &OperationRecord) {
            self.0.lock().unwrap().push((record.operation, record.tag));
        }
    }

    fn recording_client(transport: Arc<ScriptedTransport>) -> (CacheClient, Arc<Records>) {
        let records = Arc::new(Records::default());
        let client = CacheClient::builder()
            .transport(transport)
            .config(CacheClientConfig::new(Duration::from_secs(60)).listener(records.clone()))
            .build()
            .unwrap();
        (client, records)
    }

    #[tokio::test]
    async fn test_batch_validation_failure_is_reported() {
        let (client, records) = recording_client(ScriptedTransport::answering(vec![]));
        assert!(client.get_batch(" ", ["a"]).await.is_error());
        assert!(client.set_batch(" ", [("a", "1")], None).await.is_error());
        assert_eq!(
            *records.0.lock().unwrap(),
            vec![("get_batch", "Error"), ("set_batch", "Error")]
        );
    }

    #[tokio::test]
    async fn test_batch_reports_aggregate_after_items() {
        let transport = ScriptedTransport::answering(vec![Ok(Payload::Miss), Ok(Payload::Miss)]);
        let (client, records) = recording_client(transport);
        client.get_batch("cache", ["a", "b"]).await;
        assert_eq!(
            *records.0.lock().unwrap(),
            vec![("get", "Miss"), ("get", "Miss"), ("get_batch", "Success")]
        );
    }
}
