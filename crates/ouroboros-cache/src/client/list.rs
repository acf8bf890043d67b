//! List operations

use super::CacheClient;
use crate::range::validate_list_slice;
use crate::request::{CacheCommand, Payload, Request};
use crate::responses::{
    ListConcatenate, ListFetch, ListLength, ListPop, ListPush, ListRemoveValue, ListRetain,
};
use crate::ttl::CollectionTtl;
use crate::types::{ByteLike, CacheValue, ListEnd};
use crate::validation::{validate_cache_name, validate_collection_name, validate_truncate_size};

const KIND: &str = "List";

/// Options for pushes and concatenations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ListPushOptions {
    /// After the push, trim the opposite end so at most this many values
    /// remain.
    pub truncate_to_size: Option<u32>,
    pub ttl: CollectionTtl,
}

impl ListPushOptions {
    pub fn truncate_to_size(mut self, size: u32) -> Self {
        self.truncate_to_size = Some(size);
        self
    }

    pub fn ttl(mut self, ttl: CollectionTtl) -> Self {
        self.ttl = ttl;
        self
    }
}

impl CacheClient {
    /// Values in `[start, end)`; negative indexes count from the back.
    pub async fn list_fetch(
        &self,
        cache_name: &str,
        list: impl Into<ByteLike>,
        start: Option<i32>,
        end: Option<i32>,
    ) -> ListFetch {
        let list = list.into();
        self.dispatcher
            .call(
                "list_fetch",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &list)?;
                    validate_list_slice(start, end)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::ListFetch {
                            list: list.into_bytes(),
                            start,
                            end,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Values(values) => Some(ListFetch::Hit(
                        values.into_iter().map(CacheValue::new).collect(),
                    )),
                    Payload::Miss => Some(ListFetch::Miss),
                    _ => None,
                },
            )
            .await
    }

    pub async fn list_length(&self, cache_name: &str, list: impl Into<ByteLike>) -> ListLength {
        let list = list.into();
        self.dispatcher
            .call(
                "list_length",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &list)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::ListLength {
                            list: list.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Length(n) => Some(ListLength::Hit(n)),
                    Payload::Miss => Some(ListLength::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Push at the front, then trim the back to `truncate_to_size`.
    pub async fn list_push_front(
        &self,
        cache_name: &str,
        list: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        options: ListPushOptions,
    ) -> ListPush {
        let outcome = self
            .concatenate("list_push_front", cache_name, list.into(), vec![value.into()], ListEnd::Front, options)
            .await;
        match outcome {
            ListConcatenate::Success(n) => ListPush::Success(n),
            ListConcatenate::Error(err) => ListPush::Error(err),
        }
    }

    /// Push at the back, then trim the front to `truncate_to_size`.
    pub async fn list_push_back(
        &self,
        cache_name: &str,
        list: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        options: ListPushOptions,
    ) -> ListPush {
        let outcome = self
            .concatenate("list_push_back", cache_name, list.into(), vec![value.into()], ListEnd::Back, options)
            .await;
        match outcome {
            ListConcatenate::Success(n) => ListPush::Success(n),
            ListConcatenate::Error(err) => ListPush::Error(err),
        }
    }

    /// Prepend `values` in order as one mutation.
    pub async fn list_concatenate_front<V: Into<ByteLike>>(
        &self,
        cache_name: &str,
        list: impl Into<ByteLike>,
        values: impl IntoIterator<Item = V>,
        options: ListPushOptions,
    ) -> ListConcatenate {
        let values = values.into_iter().map(Into::into).collect();
        self.concatenate("list_concatenate_front", cache_name, list.into(), values, ListEnd::Front, options)
            .await
    }

    /// Append `values` in order as one mutation.
    pub async fn list_concatenate_back<V: Into<ByteLike>>(
        &self,
        cache_name: &str,
        list: impl Into<ByteLike>,
        values: impl IntoIterator<Item = V>,
        options: ListPushOptions,
    ) -> ListConcatenate {
        let values = values.into_iter().map(Into::into).collect();
        self.concatenate("list_concatenate_back", cache_name, list.into(), values, ListEnd::Back, options)
            .await
    }

    async fn concatenate(
        &self,
        operation: &'static str,
        cache_name: &str,
        list: ByteLike,
        values: Vec<ByteLike>,
        end: ListEnd,
        options: ListPushOptions,
    ) -> ListConcatenate {
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                operation,
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &list)?;
                    validate_truncate_size(options.truncate_to_size)?;
                    let ttl = options.ttl.resolve(default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::ListConcatenate {
                            list: list.into_bytes(),
                            values: values.into_iter().map(ByteLike::into_bytes).collect(),
                            end,
                            truncate_to_size: options.truncate_to_size,
                            ttl,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Length(n) => Some(ListConcatenate::Success(n)),
                    _ => None,
                },
            )
            .await
    }

    pub async fn list_pop_front(&self, cache_name: &str, list: impl Into<ByteLike>) -> ListPop {
        self.pop("list_pop_front", cache_name, list.into(), ListEnd::Front)
            .await
    }

    pub async fn list_pop_back(&self, cache_name: &str, list: impl Into<ByteLike>) -> ListPop {
        self.pop("list_pop_back", cache_name, list.into(), ListEnd::Back)
            .await
    }

    async fn pop(
        &self,
        operation: &'static str,
        cache_name: &str,
        list: ByteLike,
        end: ListEnd,
    ) -> ListPop {
        self.dispatcher
            .call(
                operation,
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &list)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::ListPop {
                            list: list.into_bytes(),
                            end,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Value(v) => Some(ListPop::Hit(CacheValue::new(v))),
                    Payload::Miss => Some(ListPop::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Remove every occurrence of `value`; the rest keep their order.
    pub async fn list_remove_value(
        &self,
        cache_name: &str,
        list: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
    ) -> ListRemoveValue {
        let (list, value) = (list.into(), value.into());
        self.dispatcher
            .call(
                "list_remove_value",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &list)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::ListRemoveValue {
                            list: list.into_bytes(),
                            value: value.into_bytes(),
                        },
                    ))
                },
                |payload| matches!(payload, Payload::Unit).then_some(ListRemoveValue::Success),
            )
            .await
    }

    /// Keep only `[start, end)`. An absent list is left absent.
    pub async fn list_retain(
        &self,
        cache_name: &str,
        list: impl Into<ByteLike>,
        start: Option<i32>,
        end: Option<i32>,
        ttl: CollectionTtl,
    ) -> ListRetain {
        let list = list.into();
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                "list_retain",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &list)?;
                    validate_list_slice(start, end)?;
                    let ttl = ttl.resolve(default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::ListRetain {
                            list: list.into_bytes(),
                            start,
                            end,
                            ttl,
                        },
                    ))
                },
                |payload| matches!(payload, Payload::Unit).then_some(ListRetain::Success),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::error::ErrorCode;
    use crate::responses::Outcome;

    #[tokio::test]
    async fn test_push_back_sends_truncation_for_front() {
        let transport = ScriptedTransport::answering(vec![Ok(Payload::Length(2))]);
        let client = client(transport.clone());
        let outcome = client
            .list_push_back("cache", "l", "three", ListPushOptions::default().truncate_to_size(2))
            .await;
        assert_eq!(outcome.list_length(), Some(2));

        let requests = transport.requests.lock().unwrap();
        assert!(matches!(
            &requests[0],
            Request::Cache {
                command: CacheCommand::ListConcatenate {
                    end: ListEnd::Back,
                    truncate_to_size: Some(2),
                    ..
                },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_zero_truncation_is_invalid() {
        let transport = ScriptedTransport::answering(vec![]);
        let client = client(transport.clone());
        let outcome = client
            .list_push_front("cache", "l", "v", ListPushOptions::default().truncate_to_size(0))
            .await;
        assert_eq!(outcome.error().map(|e| e.code()), Some(ErrorCode::InvalidArgument));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_inverted_slice_is_invalid() {
        let client = client(ScriptedTransport::answering(vec![]));
        let outcome = client.list_fetch("cache", "l", Some(3), Some(1)).await;
        assert_eq!(
            outcome.error().map(|e| e.message().to_string()).as_deref(),
            Some("endIndex (exclusive) must be larger than startIndex (inclusive)")
        );
    }
}
