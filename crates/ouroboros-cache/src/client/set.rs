//! Set operations

use super::CacheClient;
use crate::range::validate_count;
use crate::request::{CacheCommand, Payload, Request};
use crate::responses::{
    SetAddElements, SetContainsElement, SetContainsElements, SetFetch, SetLength, SetPop,
    SetRemoveElements, SetSample,
};
use crate::ttl::CollectionTtl;
use crate::types::{ByteLike, CacheValue};
use crate::validation::{validate_cache_name, validate_collection_name, validate_sample_limit};

const KIND: &str = "Set";

impl CacheClient {
    pub async fn set_add_element(
        &self,
        cache_name: &str,
        set: impl Into<ByteLike>,
        element: impl Into<ByteLike>,
        ttl: CollectionTtl,
    ) -> SetAddElements {
        let element: ByteLike = element.into();
        self.set_add_elements(cache_name, set, [element], ttl)
            .await
    }

    /// Adding an existing member is a no-op success.
    pub async fn set_add_elements<E: Into<ByteLike>>(
        &self,
        cache_name: &str,
        set: impl Into<ByteLike>,
        elements: impl IntoIterator<Item = E>,
        ttl: CollectionTtl,
    ) -> SetAddElements {
        let set = set.into();
        let elements: Vec<Vec<u8>> = elements.into_iter().map(|e| e.into().into_bytes()).collect();
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                "set_add_elements",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &set)?;
                    let ttl = ttl.resolve(default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SetAddElements {
                            set: set.into_bytes(),
                            elements,
                            ttl,
                        },
                    ))
                },
                |payload| matches!(payload, Payload::Unit).then_some(SetAddElements::Success),
            )
            .await
    }

    pub async fn set_remove_element(
        &self,
        cache_name: &str,
        set: impl Into<ByteLike>,
        element: impl Into<ByteLike>,
    ) -> SetRemoveElements {
        let element: ByteLike = element.into();
        self.set_remove_elements(cache_name, set, [element])
            .await
    }

    /// Removing a non-member is a no-op success.
    pub async fn set_remove_elements<E: Into<ByteLike>>(
        &self,
        cache_name: &str,
        set: impl Into<ByteLike>,
        elements: impl IntoIterator<Item = E>,
    ) -> SetRemoveElements {
        let set = set.into();
        let elements: Vec<Vec<u8>> = elements.into_iter().map(|e| e.into().into_bytes()).collect();
        self.dispatcher
            .call(
                "set_remove_elements",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &set)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SetRemoveElements {
                            set: set.into_bytes(),
                            elements,
                        },
                    ))
                },
                |payload| matches!(payload, Payload::Unit).then_some(SetRemoveElements::Success),
            )
            .await
    }

    pub async fn set_fetch(&self, cache_name: &str, set: impl Into<ByteLike>) -> SetFetch {
        let set = set.into();
        self.dispatcher
            .call(
                "set_fetch",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &set)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SetFetch {
                            set: set.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Values(values) => Some(SetFetch::Hit(
                        values.into_iter().map(CacheValue::new).collect(),
                    )),
                    Payload::Miss => Some(SetFetch::Miss),
                    _ => None,
                },
            )
            .await
    }

    pub async fn set_contains_element(
        &self,
        cache_name: &str,
        set: impl Into<ByteLike>,
        element: impl Into<ByteLike>,
    ) -> SetContainsElement {
        let element: ByteLike = element.into();
        match self
            .set_contains_elements(cache_name, set, [element])
            .await
        {
            SetContainsElements::Hit(flags) => {
                SetContainsElement::Hit(flags.first().map_or(false, |(_, found)| *found))
            }
            SetContainsElements::Miss => SetContainsElement::Miss,
            SetContainsElements::Error(err) => SetContainsElement::Error(err),
        }
    }

    pub async fn set_contains_elements<E: Into<ByteLike>>(
        &self,
        cache_name: &str,
        set: impl Into<ByteLike>,
        elements: impl IntoIterator<Item = E>,
    ) -> SetContainsElements {
        let set = set.into();
        let elements: Vec<Vec<u8>> = elements.into_iter().map(|e| e.into().into_bytes()).collect();
        let requested = elements.clone();
        self.dispatcher
            .call(
                "set_contains_elements",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &set)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SetContainsElements {
                            set: set.into_bytes(),
                            elements,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Flags(flags) if flags.len() == requested.len() => {
                        Some(SetContainsElements::Hit(
                            requested.into_iter().map(CacheValue::new).zip(flags).collect(),
                        ))
                    }
                    Payload::Miss => Some(SetContainsElements::Miss),
                    _ => None,
                },
            )
            .await
    }

    pub async fn set_length(&self, cache_name: &str, set: impl Into<ByteLike>) -> SetLength {
        let set = set.into();
        self.dispatcher
            .call(
                "set_length",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &set)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SetLength {
                            set: set.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Length(n) => Some(SetLength::Hit(n)),
                    Payload::Miss => Some(SetLength::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Up to `limit` members, without removing them.
    pub async fn set_sample(
        &self,
        cache_name: &str,
        set: impl Into<ByteLike>,
        limit: i32,
    ) -> SetSample {
        let set = set.into();
        self.dispatcher
            .call(
                "set_sample",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &set)?;
                    let limit = validate_sample_limit(limit)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SetSample {
                            set: set.into_bytes(),
                            limit,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Values(values) => Some(SetSample::Hit(
                        values.into_iter().map(CacheValue::new).collect(),
                    )),
                    Payload::Miss => Some(SetSample::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Remove and return up to `count` members.
    pub async fn set_pop(&self, cache_name: &str, set: impl Into<ByteLike>, count: i32) -> SetPop {
        let set = set.into();
        self.dispatcher
            .call(
                "set_pop",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &set)?;
                    let count = validate_count(Some(count))?.unwrap_or(1);
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SetPop {
                            set: set.into_bytes(),
                            count,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Values(values) => Some(SetPop::Hit(
                        values.into_iter().map(CacheValue::new).collect(),
                    )),
                    Payload::Miss => Some(SetPop::Miss),
                    _ => None,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::error::ErrorCode;
    use crate::request::Payload;
    use crate::responses::*;

    #[tokio::test]
    async fn test_contains_elements_aligns_flags() {
        let transport = ScriptedTransport::answering(vec![Ok(Payload::Flags(vec![true, false]))]);
        let client = client(transport);
        let outcome = client.set_contains_elements("cache", "s", ["a", "b"]).await;
        assert_eq!(outcome.contains_elements(), Some(vec![true, false]));
        assert_eq!(outcome.value().unwrap().get("b"), Some(&false));
    }

    #[tokio::test]
    async fn test_sample_and_pop_limits() {
        let transport = ScriptedTransport::answering(vec![]);
        let client = client(transport.clone());
        assert_eq!(
            client.set_sample("cache", "s", -1).await.error().map(|e| e.code()),
            Some(ErrorCode::InvalidArgument)
        );
        assert_eq!(
            client.set_pop("cache", "s", 0).await.error().map(|e| e.code()),
            Some(ErrorCode::InvalidArgument)
        );
        assert_eq!(transport.request_count(), 0);
    }
}
