//! Leaderboards of one cache
//!
//! An absent leaderboard reads as empty; it is created by the first upsert
//! and dropped once its last element is removed.

use crate::ranking::Ranking;
use ouroboros_cache::{resolve_range, LeaderboardCommand, Payload, RankedElement};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct Leaderboards {
    boards: RwLock<HashMap<String, Ranking<u64>>>,
}

fn ranked(elements: impl IntoIterator<Item = (u64, f64, u64)>) -> Payload {
    Payload::Ranked(
        elements
            .into_iter()
            .map(|(id, score, rank)| RankedElement { id, score, rank })
            .collect(),
    )
}

/// Attach ranks, counting from `first_rank`.
fn with_ranks(
    elements: impl IntoIterator<Item = (u64, f64)>,
    first_rank: usize,
) -> impl Iterator<Item = (u64, f64, u64)> {
    elements
        .into_iter()
        .enumerate()
        .map(move |(i, (id, score))| (id, score, (first_rank + i) as u64))
}

impl Leaderboards {
    pub fn apply(&self, name: &str, command: LeaderboardCommand) -> Payload {
        match command {
            LeaderboardCommand::Upsert { elements } => {
                let mut boards = self.boards.write();
                let board = boards.entry(name.to_string()).or_default();
                for (id, score) in elements {
                    board.upsert(id, score);
                }
                if board.is_empty() {
                    boards.remove(name);
                }
                Payload::Unit
            }
            LeaderboardCommand::FetchByScore {
                min_score,
                max_score,
                order,
                offset,
                count,
            } => self.read(name, |board| {
                ranked(
                    board
                        .ranked_by_score(min_score, max_score, order)
                        .skip(offset as usize)
                        .take(count as usize),
                )
            }),
            LeaderboardCommand::FetchByRank { start, end, order } => self.read(name, |board| {
                let ordered = board.ordered(order);
                let bound = |rank: u32| Some(i32::try_from(rank).unwrap_or(i32::MAX));
                let (start, end) = resolve_range(ordered.len(), bound(start), bound(end));
                ranked(with_ranks(
                    ordered.into_iter().skip(start).take(end - start),
                    start,
                ))
            }),
            LeaderboardCommand::GetRank { ids, order } => self.read(name, |board| {
                ranked(ids.iter().filter_map(|id| {
                    let score = board.score(id)?;
                    let rank = board.rank(id, order)?;
                    Some((*id, score, rank))
                }))
            }),
            LeaderboardCommand::Length => {
                let len = self.boards.read().get(name).map_or(0, Ranking::len);
                Payload::Length(len as u32)
            }
            LeaderboardCommand::RemoveElements { ids } => {
                let mut boards = self.boards.write();
                if let Some(board) = boards.get_mut(name) {
                    ids.iter().for_each(|id| {
                        board.remove(id);
                    });
                    if board.is_empty() {
                        boards.remove(name);
                    }
                }
                Payload::Unit
            }
            LeaderboardCommand::Delete => {
                self.boards.write().remove(name);
                Payload::Unit
            }
        }
    }

    fn read(&self, name: &str, f: impl FnOnce(&Ranking<u64>) -> Payload) -> Payload {
        match self.boards.read().get(name) {
            Some(board) => f(board),
            None => Payload::Ranked(Vec::new()),
        }
    }

    pub fn clear(&self) {
        self.boards.write().clear();
    }
}
