//! Sorted-set operations

use super::CacheClient;
use crate::range::{validate_count, validate_offset, validate_rank_range, validate_score_range};
use crate::request::{CacheCommand, Payload, Request};
use crate::responses::{
    SortedSetFetch, SortedSetGetRank, SortedSetGetScore, SortedSetGetScores,
    SortedSetIncrementScore, SortedSetLength, SortedSetLengthByScore, SortedSetPutElements,
    SortedSetRemoveElements,
};
use crate::ttl::CollectionTtl;
use crate::types::{ByteLike, CacheValue, SortOrder};
use crate::validation::{
    validate_cache_name, validate_collection_name, validate_score, validate_score_increment,
};

const KIND: &str = "Sorted set";

/// Rank window `[start_rank, end_rank)` in the requested order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortedSetFetchByRankOptions {
    pub start_rank: Option<i32>,
    pub end_rank: Option<i32>,
    pub order: SortOrder,
}

impl SortedSetFetchByRankOptions {
    pub fn start_rank(mut self, rank: i32) -> Self {
        self.start_rank = Some(rank);
        self
    }

    pub fn end_rank(mut self, rank: i32) -> Self {
        self.end_rank = Some(rank);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}

/// Inclusive score window, paginated after filtering and ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SortedSetFetchByScoreOptions {
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub order: SortOrder,
    pub offset: Option<i32>,
    pub count: Option<i32>,
}

impl SortedSetFetchByScoreOptions {
    pub fn min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }

    pub fn max_score(mut self, score: f64) -> Self {
        self.max_score = Some(score);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn count(mut self, count: i32) -> Self {
        self.count = Some(count);
        self
    }
}

impl CacheClient {
    pub async fn sorted_set_put_element(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        score: f64,
        ttl: CollectionTtl,
    ) -> SortedSetPutElements {
        let value: ByteLike = value.into();
        self.sorted_set_put_elements(cache_name, sorted_set, [(value, score)], ttl)
            .await
    }

    /// Insert values, overwriting the score of existing ones.
    pub async fn sorted_set_put_elements<V: Into<ByteLike>>(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        elements: impl IntoIterator<Item = (V, f64)>,
        ttl: CollectionTtl,
    ) -> SortedSetPutElements {
        let sorted_set = sorted_set.into();
        let elements: Vec<(Vec<u8>, f64)> = elements
            .into_iter()
            .map(|(v, score)| (v.into().into_bytes(), score))
            .collect();
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                "sorted_set_put_elements",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    elements.iter().try_for_each(|(_, score)| validate_score(*score))?;
                    let ttl = ttl.resolve(default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetPutElements {
                            sorted_set: sorted_set.into_bytes(),
                            elements,
                            ttl,
                        },
                    ))
                },
                |payload| {
                    matches!(payload, Payload::Unit).then_some(SortedSetPutElements::Success)
                },
            )
            .await
    }

    /// Elements in `[start_rank, end_rank)` of the requested order. Negative
    /// ranks count from the end of the set.
    pub async fn sorted_set_fetch_by_rank(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        options: SortedSetFetchByRankOptions,
    ) -> SortedSetFetch {
        let sorted_set = sorted_set.into();
        self.dispatcher
            .call(
                "sorted_set_fetch_by_rank",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    validate_rank_range(options.start_rank, options.end_rank)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetFetchByRank {
                            sorted_set: sorted_set.into_bytes(),
                            start: options.start_rank,
                            end: options.end_rank,
                            order: options.order,
                        },
                    ))
                },
                decode_fetch,
            )
            .await
    }

    pub async fn sorted_set_fetch_by_score(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        options: SortedSetFetchByScoreOptions,
    ) -> SortedSetFetch {
        let sorted_set = sorted_set.into();
        self.dispatcher
            .call(
                "sorted_set_fetch_by_score",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    validate_score_range(options.min_score, options.max_score)?;
                    let offset = validate_offset(options.offset)?;
                    let count = validate_count(options.count)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetFetchByScore {
                            sorted_set: sorted_set.into_bytes(),
                            min_score: options.min_score,
                            max_score: options.max_score,
                            order: options.order,
                            offset,
                            count,
                        },
                    ))
                },
                decode_fetch,
            )
            .await
    }

    /// Rank of `value` under `order`; `Miss` if the set or the value is absent.
    pub async fn sorted_set_get_rank(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        order: SortOrder,
    ) -> SortedSetGetRank {
        let (sorted_set, value) = (sorted_set.into(), value.into());
        self.dispatcher
            .call(
                "sorted_set_get_rank",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetGetRank {
                            sorted_set: sorted_set.into_bytes(),
                            value: value.into_bytes(),
                            order,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Rank(rank) => Some(SortedSetGetRank::Hit(rank)),
                    Payload::Miss => Some(SortedSetGetRank::Miss),
                    _ => None,
                },
            )
            .await
    }

    pub async fn sorted_set_get_score(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
    ) -> SortedSetGetScore {
        let value: ByteLike = value.into();
        let requested = CacheValue::new(value.as_bytes().to_vec());
        match self
            .sorted_set_get_scores(cache_name, sorted_set, [value])
            .await
        {
            SortedSetGetScores::Hit(mut found) => match found.pop() {
                Some(element) => SortedSetGetScore::Hit(element),
                None => SortedSetGetScore::Miss(requested),
            },
            SortedSetGetScores::Miss => SortedSetGetScore::Miss(requested),
            SortedSetGetScores::Error(err) => SortedSetGetScore::Error(err),
        }
    }

    /// Scores of the values that exist. Missing values are left out of the
    /// `Hit`; `Miss` only when the set itself is absent.
    pub async fn sorted_set_get_scores<V: Into<ByteLike>>(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        values: impl IntoIterator<Item = V>,
    ) -> SortedSetGetScores {
        let sorted_set = sorted_set.into();
        let values: Vec<Vec<u8>> = values.into_iter().map(|v| v.into().into_bytes()).collect();
        self.dispatcher
            .call(
                "sorted_set_get_scores",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetGetScores {
                            sorted_set: sorted_set.into_bytes(),
                            values,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Scored(found) => Some(SortedSetGetScores::Hit(found)),
                    Payload::Miss => Some(SortedSetGetScores::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Add `amount` to the score of `value`; an absent value starts at `0`.
    pub async fn sorted_set_increment_score(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        amount: f64,
        ttl: CollectionTtl,
    ) -> SortedSetIncrementScore {
        let (sorted_set, value) = (sorted_set.into(), value.into());
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                "sorted_set_increment_score",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    validate_score_increment(amount)?;
                    let ttl = ttl.resolve(default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetIncrementScore {
                            sorted_set: sorted_set.into_bytes(),
                            value: value.into_bytes(),
                            amount,
                            ttl,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Float(score) => Some(SortedSetIncrementScore::Success(score)),
                    _ => None,
                },
            )
            .await
    }

    pub async fn sorted_set_remove_element(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
    ) -> SortedSetRemoveElements {
        let value: ByteLike = value.into();
        self.sorted_set_remove_elements(cache_name, sorted_set, [value])
            .await
    }

    pub async fn sorted_set_remove_elements<V: Into<ByteLike>>(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        values: impl IntoIterator<Item = V>,
    ) -> SortedSetRemoveElements {
        let sorted_set = sorted_set.into();
        let values: Vec<Vec<u8>> = values.into_iter().map(|v| v.into().into_bytes()).collect();
        self.dispatcher
            .call(
                "sorted_set_remove_elements",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetRemoveElements {
                            sorted_set: sorted_set.into_bytes(),
                            values,
                        },
                    ))
                },
                |payload| {
                    matches!(payload, Payload::Unit).then_some(SortedSetRemoveElements::Success)
                },
            )
            .await
    }

    pub async fn sorted_set_length(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
    ) -> SortedSetLength {
        let sorted_set = sorted_set.into();
        self.dispatcher
            .call(
                "sorted_set_length",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetLength {
                            sorted_set: sorted_set.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Length(n) => Some(SortedSetLength::Hit(n)),
                    Payload::Miss => Some(SortedSetLength::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// Number of elements with a score in the inclusive `[min_score, max_score]`.
    pub async fn sorted_set_length_by_score(
        &self,
        cache_name: &str,
        sorted_set: impl Into<ByteLike>,
        min_score: Option<f64>,
        max_score: Option<f64>,
    ) -> SortedSetLengthByScore {
        let sorted_set = sorted_set.into();
        self.dispatcher
            .call(
                "sorted_set_length_by_score",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &sorted_set)?;
                    validate_score_range(min_score, max_score)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::SortedSetLengthByScore {
                            sorted_set: sorted_set.into_bytes(),
                            min_score,
                            max_score,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Length(n) => Some(SortedSetLengthByScore::Hit(n)),
                    Payload::Miss => Some(SortedSetLengthByScore::Miss),
                    _ => None,
                },
            )
            .await
    }
}

fn decode_fetch(payload: Payload) -> Option<SortedSetFetch> {
    match payload {
        Payload::Scored(elements) => Some(SortedSetFetch::Hit(elements)),
        Payload::Miss => Some(SortedSetFetch::Miss),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::error::ErrorCode;
    use crate::responses::Outcome;
    use crate::types::ScoredElement;

    #[tokio::test]
    async fn test_infinite_increment_never_reaches_transport() {
        let transport = ScriptedTransport::answering(vec![]);
        let client = client(transport.clone());
        let outcome = client
            .sorted_set_increment_score(
                "cache",
                "ss",
                "v",
                f64::INFINITY,
                CollectionTtl::from_cache_ttl(),
            )
            .await;
        assert_eq!(
            outcome.error().map(|e| e.code()),
            Some(ErrorCode::InvalidArgument)
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_inverted_score_range_message() {
        let transport = ScriptedTransport::answering(vec![]);
        let client = client(transport.clone());
        let outcome = client
            .sorted_set_fetch_by_score(
                "cache",
                "ss",
                SortedSetFetchByScoreOptions::default()
                    .min_score(1000.0)
                    .max_score(100.0),
            )
            .await;
        let err = outcome.error().unwrap();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(
            err.to_string(),
            "Invalid argument passed to cache client: minScore must be less than or equal to maxScore"
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_rank_window_limits() {
        let client = client(ScriptedTransport::answering(vec![]));
        let too_wide = client
            .sorted_set_fetch_by_rank(
                "cache",
                "ss",
                SortedSetFetchByRankOptions::default().start_rank(0).end_rank(8193),
            )
            .await;
        assert!(too_wide.is_error());

        let inverted = client
            .sorted_set_fetch_by_rank(
                "cache",
                "ss",
                SortedSetFetchByRankOptions::default().start_rank(5).end_rank(5),
            )
            .await;
        assert!(inverted.is_error());
    }

    #[tokio::test]
    async fn test_offset_and_count_validation() {
        let client = client(ScriptedTransport::answering(vec![]));
        let negative_offset = client
            .sorted_set_fetch_by_score("cache", "ss", SortedSetFetchByScoreOptions::default().offset(-1))
            .await;
        assert_eq!(
            negative_offset.error().map(|e| e.message().to_string()).as_deref(),
            Some("offset must be non-negative (>= 0)")
        );

        let zero_count = client
            .sorted_set_fetch_by_score("cache", "ss", SortedSetFetchByScoreOptions::default().count(0))
            .await;
        assert_eq!(
            zero_count.error().map(|e| e.message().to_string()).as_deref(),
            Some("count must be strictly positive (> 0)")
        );
    }

    #[tokio::test]
    async fn test_get_score_miss_carries_value() {
        let transport = ScriptedTransport::answering(vec![
            Ok(Payload::Scored(vec![])),
            Ok(Payload::Scored(vec![ScoredElement::new(b"a".to_vec(), 2.5)])),
        ]);
        let client = client(transport);
        assert_eq!(
            client.sorted_set_get_score("cache", "ss", "a").await,
            SortedSetGetScore::Miss(CacheValue::new(b"a".to_vec()))
        );
        assert_eq!(
            client.sorted_set_get_score("cache", "ss", "a").await.score(),
            Some(2.5)
        );
    }

    #[tokio::test]
    async fn test_nan_score_rejected() {
        let client = client(ScriptedTransport::answering(vec![]));
        let outcome = client
            .sorted_set_put_element("cache", "ss", "a", f64::NAN, CollectionTtl::default())
            .await;
        assert!(outcome.is_error());
    }
}
