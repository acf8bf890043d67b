//! Leaderboards
//!
//! A leaderboard orders numeric ids by score. Every request and response is
//! capped at [`MAX_RANGE_WINDOW`] elements; larger reads must be paginated.

use super::{CacheClient, Dispatcher};
use crate::error::SdkError;
use crate::range::{validate_count, validate_offset, validate_score_range, MAX_RANGE_WINDOW};
use crate::request::{LeaderboardCommand, Payload, Request};
use crate::responses::{
    LeaderboardDelete, LeaderboardFetch, LeaderboardLength, LeaderboardRemoveElements,
    LeaderboardUpsert,
};
use crate::types::SortOrder;
use crate::validation::{
    validate_cache_name, validate_leaderboard_batch, validate_leaderboard_name, validate_score,
};

/// Score window for [`Leaderboard::fetch_by_score`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LeaderboardFetchByScoreOptions {
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub order: SortOrder,
    pub offset: Option<i32>,
    /// At most [`MAX_RANGE_WINDOW`]; defaults to it.
    pub count: Option<i32>,
}

impl LeaderboardFetchByScoreOptions {
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
    /// Handle to the leaderboard `name` inside `cache_name`. Names are
    /// validated on each call.
    pub fn leaderboard(&self, cache_name: impl Into<String>, name: impl Into<String>) -> Leaderboard {
        Leaderboard {
            dispatcher: self.dispatcher.clone(),
            cache_name: cache_name.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone)]
pub struct Leaderboard {
    dispatcher: Dispatcher,
    cache_name: String,
    name: String,
}

impl Leaderboard {
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names are checked before `command` validates its own arguments.
    fn request(
        &self,
        command: impl FnOnce() -> Result<LeaderboardCommand, SdkError>,
    ) -> Result<Request, SdkError> {
        validate_cache_name(&self.cache_name)?;
        validate_leaderboard_name(&self.name)?;
        Ok(Request::Leaderboard {
            cache_name: self.cache_name.clone(),
            leaderboard: self.name.clone(),
            command: command()?,
        })
    }

    /// Insert ids or overwrite their scores.
    pub async fn upsert(&self, elements: impl IntoIterator<Item = (u64, f64)>) -> LeaderboardUpsert {
        let elements: Vec<(u64, f64)> = elements.into_iter().collect();
        self.dispatcher
            .call(
                "leaderboard_upsert",
                &self.cache_name,
                || {
                    self.request(|| {
                        validate_leaderboard_batch(elements.len())?;
                        elements.iter().try_for_each(|(_, score)| validate_score(*score))?;
                        Ok(LeaderboardCommand::Upsert { elements })
                    })
                },
                |payload| matches!(payload, Payload::Unit).then_some(LeaderboardUpsert::Success),
            )
            .await
    }

    /// Elements with a score in the inclusive window, paginated after
    /// ordering.
    pub async fn fetch_by_score(&self, options: LeaderboardFetchByScoreOptions) -> LeaderboardFetch {
        self.dispatcher
            .call(
                "leaderboard_fetch_by_score",
                &self.cache_name,
                || {
                    self.request(|| {
                        validate_score_range(options.min_score, options.max_score)?;
                        let offset = validate_offset(options.offset)?.unwrap_or(0);
                        let count =
                            validate_count(options.count)?.unwrap_or(MAX_RANGE_WINDOW as u32);
                        validate_leaderboard_batch(count as usize)?;
                        Ok(LeaderboardCommand::FetchByScore {
                            min_score: options.min_score,
                            max_score: options.max_score,
                            order: options.order,
                            offset,
                            count,
                        })
                    })
                },
                decode_fetch,
            )
            .await
    }

    /// Elements ranked `[start_rank, end_rank)` under `order`. Rank 0 is the
    /// lowest score when ascending and the highest when descending.
    pub async fn fetch_by_rank(&self, start_rank: u32, end_rank: u32, order: SortOrder) -> LeaderboardFetch {
        self.dispatcher
            .call(
                "leaderboard_fetch_by_rank",
                &self.cache_name,
                || {
                    self.request(|| {
                        if start_rank >= end_rank {
                            return Err(SdkError::invalid_argument(
                                "start rank must be less than end rank",
                            ));
                        }
                        if i64::from(end_rank - start_rank) > MAX_RANGE_WINDOW {
                            return Err(SdkError::invalid_argument(format!(
                                "end rank - start rank must be less than or equal to {MAX_RANGE_WINDOW}"
                            )));
                        }
                        Ok(LeaderboardCommand::FetchByRank {
                            start: start_rank,
                            end: end_rank,
                            order,
                        })
                    })
                },
                decode_fetch,
            )
            .await
    }

    /// Ranked entries for the ids present; absent ids are left out.
    pub async fn get_rank(&self, ids: impl IntoIterator<Item = u64>, order: SortOrder) -> LeaderboardFetch {
        let ids: Vec<u64> = ids.into_iter().collect();
        self.dispatcher
            .call(
                "leaderboard_get_rank",
                &self.cache_name,
                || {
                    self.request(|| {
                        validate_leaderboard_batch(ids.len())?;
                        Ok(LeaderboardCommand::GetRank { ids, order })
                    })
                },
                decode_fetch,
            )
            .await
    }

    pub async fn length(&self) -> LeaderboardLength {
        self.dispatcher
            .call(
                "leaderboard_length",
                &self.cache_name,
                || self.request(|| Ok(LeaderboardCommand::Length)),
                |payload| match payload {
                    Payload::Length(n) => Some(LeaderboardLength::Success(n)),
                    _ => None,
                },
            )
            .await
    }

    pub async fn remove_elements(&self, ids: impl IntoIterator<Item = u64>) -> LeaderboardRemoveElements {
        let ids: Vec<u64> = ids.into_iter().collect();
        self.dispatcher
            .call(
                "leaderboard_remove_elements",
                &self.cache_name,
                || {
                    self.request(|| {
                        validate_leaderboard_batch(ids.len())?;
                        Ok(LeaderboardCommand::RemoveElements { ids })
                    })
                },
                |payload| {
                    matches!(payload, Payload::Unit).then_some(LeaderboardRemoveElements::Success)
                },
            )
            .await
    }

    pub async fn delete(&self) -> LeaderboardDelete {
        self.dispatcher
            .call(
                "leaderboard_delete",
                &self.cache_name,
                || self.request(|| Ok(LeaderboardCommand::Delete)),
                |payload| matches!(payload, Payload::Unit).then_some(LeaderboardDelete::Success),
            )
            .await
    }
}

fn decode_fetch(payload: Payload) -> Option<LeaderboardFetch> {
    match payload {
        Payload::Ranked(elements) => Some(LeaderboardFetch::Success(elements)),
        _ => None,
    }
}
