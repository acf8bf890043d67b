use crate::types::{CacheValue, ScoredElement};
use std::collections::HashMap;

outcome! {
    /// Outcome of `sorted_set_put_element(s)`.
    pub enum SortedSetPutElements {
        Success,
    }
}

outcome! {
    /// Outcome of `sorted_set_fetch_by_rank` and `sorted_set_fetch_by_score`;
    /// elements are in the requested order.
    pub enum SortedSetFetch {
        Hit(Vec<ScoredElement>),
        Miss,
    }
}

impl SortedSetFetch {
    /// Natural view: `(text value, score)` pairs in fetch order.
    pub fn value(&self) -> Option<Vec<(String, f64)>> {
        match self {
            SortedSetFetch::Hit(elements) => Some(
                elements
                    .iter()
                    .map(|e| (e.value.as_string(), e.score))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn value_bytes(&self) -> Option<Vec<(Vec<u8>, f64)>> {
        match self {
            SortedSetFetch::Hit(elements) => Some(
                elements
                    .iter()
                    .map(|e| (e.value.as_bytes().to_vec(), e.score))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&[ScoredElement]> {
        match self {
            SortedSetFetch::Hit(elements) => Some(elements),
            _ => None,
        }
    }
}

outcome! {
    pub enum SortedSetGetRank {
        Hit(u64),
        Miss,
    }
}

impl SortedSetGetRank {
    pub fn rank(&self) -> Option<u64> {
        match self {
            SortedSetGetRank::Hit(rank) => Some(*rank),
            _ => None,
        }
    }
}

outcome! {
    /// Outcome of `sorted_set_get_score`. `Miss` carries the requested value.
    pub enum SortedSetGetScore {
        Hit(ScoredElement),
        Miss(CacheValue),
    }
}

impl SortedSetGetScore {
    pub fn score(&self) -> Option<f64> {
        match self {
            SortedSetGetScore::Hit(e) => Some(e.score),
            _ => None,
        }
    }
}

outcome! {
    /// Outcome of `sorted_set_get_scores`. `Hit` holds only the values that
    /// exist; `Miss` means the sorted set itself is absent.
    pub enum SortedSetGetScores {
        Hit(Vec<ScoredElement>),
        Miss,
    }
}

impl SortedSetGetScores {
    pub fn value(&self) -> Option<HashMap<String, f64>> {
        match self {
            SortedSetGetScores::Hit(elements) => Some(
                elements
                    .iter()
                    .map(|e| (e.value.as_string(), e.score))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn value_bytes(&self) -> Option<HashMap<Vec<u8>, f64>> {
        match self {
            SortedSetGetScores::Hit(elements) => Some(
                elements
                    .iter()
                    .map(|e| (e.value.as_bytes().to_vec(), e.score))
                    .collect(),
            ),
            _ => None,
        }
    }
}

outcome! {
    /// Outcome of `sorted_set_increment_score`; carries the new score.
    pub enum SortedSetIncrementScore {
        Success(f64),
    }
}

impl SortedSetIncrementScore {
    pub fn score(&self) -> Option<f64> {
        match self {
            SortedSetIncrementScore::Success(score) => Some(*score),
            _ => None,
        }
    }
}

outcome! {
    pub enum SortedSetRemoveElements {
        Success,
    }
}

outcome! {
    pub enum SortedSetLength {
        Hit(u32),
        Miss,
    }
}

impl SortedSetLength {
    pub fn length(&self) -> Option<u32> {
        match self {
            SortedSetLength::Hit(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    pub enum SortedSetLengthByScore {
        Hit(u32),
        Miss,
    }
}

impl SortedSetLengthByScore {
    pub fn length(&self) -> Option<u32> {
        match self {
            SortedSetLengthByScore::Hit(n) => Some(*n),
            _ => None,
        }
    }
}
