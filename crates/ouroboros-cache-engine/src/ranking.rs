//! Score-ordered membership shared by sorted sets and leaderboards
//!
//! Members are ordered by score. Equal scores keep the order in which the
//! members were first inserted, under both sort orders; a score update does
//! not move a member among its ties.

use ouroboros_cache::range::score_in_range;
use ouroboros_cache::SortOrder;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Member {
    score: f64,
    seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<K: Eq + Hash> {
    members: HashMap<K, Member>,
    next_seq: u64,
}

impl<K: Eq + Hash> Default for Ranking<K> {
    fn default() -> Self {
        Self {
            members: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> Ranking<K> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Insert a member or overwrite its score.
    pub fn upsert(&mut self, key: K, score: f64) {
        match self.members.get_mut(&key) {
            Some(member) => member.score = score,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.members.insert(key, Member { score, seq });
            }
        }
    }

    /// Add `amount` to a member's score, treating an absent member as 0.
    pub fn increment(&mut self, key: K, amount: f64) -> f64 {
        let score = self.score(&key).unwrap_or(0.0) + amount;
        self.upsert(key, score);
        score
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.members.remove(key).is_some()
    }

    pub fn score(&self, key: &K) -> Option<f64> {
        self.members.get(key).map(|m| m.score)
    }

    /// Every member with its score, rank 0 first.
    pub fn ordered(&self, order: SortOrder) -> Vec<(K, f64)> {
        let mut members: Vec<(&K, &Member)> = self.members.iter().collect();
        members.sort_by(|(_, a), (_, b)| compare(a, b, order));
        members
            .into_iter()
            .map(|(key, member)| (key.clone(), member.score))
            .collect()
    }

    /// Members whose score lies in the inclusive window, rank 0 first.
    pub fn ordered_by_score(
        &self,
        min_score: Option<f64>,
        max_score: Option<f64>,
        order: SortOrder,
    ) -> Vec<(K, f64)> {
        self.ordered(order)
            .into_iter()
            .filter(|(_, score)| score_in_range(*score, min_score, max_score))
            .collect()
    }

    /// Like [`Ranking::ordered_by_score`], keeping each member's rank in the
    /// whole collection.
    pub fn ranked_by_score(
        &self,
        min_score: Option<f64>,
        max_score: Option<f64>,
        order: SortOrder,
    ) -> impl Iterator<Item = (K, f64, u64)> {
        self.ordered(order)
            .into_iter()
            .enumerate()
            .filter(move |(_, (_, score))| score_in_range(*score, min_score, max_score))
            .map(|(rank, (key, score))| (key, score, rank as u64))
    }

    pub fn rank(&self, key: &K, order: SortOrder) -> Option<u64> {
        let target = self.members.get(key)?;
        let ahead = self
            .members
            .values()
            .filter(|other| compare(other, target, order) == Ordering::Less)
            .count();
        Some(ahead as u64)
    }

    pub fn count_by_score(&self, min_score: Option<f64>, max_score: Option<f64>) -> usize {
        self.members
            .values()
            .filter(|m| score_in_range(m.score, min_score, max_score))
            .count()
    }
}

fn compare(a: &Member, b: &Member, order: SortOrder) -> Ordering {
    let by_score = a.score.total_cmp(&b.score);
    let by_score = match order {
        SortOrder::Ascending => by_score,
        SortOrder::Descending => by_score.reverse(),
    };
    by_score.then(a.seq.cmp(&b.seq))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ranking<&'static str> {
        let mut ranking = Ranking::default();
        ranking.upsert("b", 2.0);
        ranking.upsert("a", 1.0);
        ranking.upsert("c", 3.0);
        ranking
    }

    #[test]
    fn test_ordering() {
        let ranking = sample();
        let asc: Vec<_> = ranking.ordered(SortOrder::Ascending).into_iter().map(|(k, _)| k).collect();
        assert_eq!(asc, vec!["a", "b", "c"]);
        let desc: Vec<_> = ranking.ordered(SortOrder::Descending).into_iter().map(|(k, _)| k).collect();
        assert_eq!(desc, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_rank_depends_on_order() {
        let ranking = sample();
        assert_eq!(ranking.rank(&"a", SortOrder::Ascending), Some(0));
        assert_eq!(ranking.rank(&"a", SortOrder::Descending), Some(2));
        assert_eq!(ranking.rank(&"zzz", SortOrder::Ascending), None);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut ranking = Ranking::default();
        ranking.upsert("first", 1.0);
        ranking.upsert("second", 1.0);
        ranking.upsert("third", 1.0);
        ranking.upsert("first", 1.0);

        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let keys: Vec<_> = ranking.ordered(order).into_iter().map(|(k, _)| k).collect();
            assert_eq!(keys, vec!["first", "second", "third"]);
        }
        assert_eq!(ranking.rank(&"third", SortOrder::Ascending), Some(2));
    }

    #[test]
    fn test_increment_from_zero() {
        let mut ranking = Ranking::default();
        assert_eq!(ranking.increment("x", 2.5), 2.5);
        assert_eq!(ranking.increment("x", -1.0), 1.5);
        assert_eq!(ranking.len(), 1);
    }

    #[test]
    fn test_score_window() {
        let ranking = sample();
        let hits = ranking.ordered_by_score(Some(2.0), Some(3.0), SortOrder::Ascending);
        assert_eq!(hits, vec![("b", 2.0), ("c", 3.0)]);
        assert_eq!(ranking.count_by_score(None, Some(1.5)), 1);
    }

    #[test]
    fn test_score_window_keeps_collection_rank() {
        let ranking = sample();
        let hits: Vec<_> = ranking
            .ranked_by_score(Some(2.0), None, SortOrder::Descending)
            .collect();
        assert_eq!(hits, vec![("c", 3.0, 0), ("b", 2.0, 1)]);
        let hits: Vec<_> = ranking
            .ranked_by_score(Some(2.0), None, SortOrder::Ascending)
            .collect();
        assert_eq!(hits, vec![("b", 2.0, 1), ("c", 3.0, 2)]);
    }
}
