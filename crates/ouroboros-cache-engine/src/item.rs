//! Items held under cache keys

use crate::error::EngineError;
use crate::ranking::Ranking;
use ouroboros_cache::ItemType;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;
use tokio::time::Instant;

/// Value stored under one cache key.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Scalar(Vec<u8>),
    Dictionary(HashMap<Vec<u8>, Vec<u8>>),
    List(VecDeque<Vec<u8>>),
    Set(HashSet<Vec<u8>>),
    SortedSet(Ranking<Vec<u8>>),
}

macro_rules! typed_access {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self) -> Result<&$ty, EngineError> {
            match self {
                Item::$variant(inner) => Ok(inner),
                other => Err(EngineError::WrongType {
                    expected: ItemType::$variant,
                    actual: other.item_type(),
                }),
            }
        }

        pub fn $get_mut(&mut self) -> Result<&mut $ty, EngineError> {
            match self {
                Item::$variant(inner) => Ok(inner),
                other => Err(EngineError::WrongType {
                    expected: ItemType::$variant,
                    actual: other.item_type(),
                }),
            }
        }
    };
}

impl Item {
    pub fn item_type(&self) -> ItemType {
        match self {
            Item::Scalar(_) => ItemType::Scalar,
            Item::Dictionary(_) => ItemType::Dictionary,
            Item::List(_) => ItemType::List,
            Item::Set(_) => ItemType::Set,
            Item::SortedSet(_) => ItemType::SortedSet,
        }
    }

    /// Collections are never stored empty; a scalar is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Item::Scalar(_) => false,
            Item::Dictionary(fields) => fields.is_empty(),
            Item::List(values) => values.is_empty(),
            Item::Set(elements) => elements.is_empty(),
            Item::SortedSet(ranking) => ranking.is_empty(),
        }
    }

    typed_access!(scalar, scalar_mut, Scalar, Vec<u8>);
    typed_access!(dictionary, dictionary_mut, Dictionary, HashMap<Vec<u8>, Vec<u8>>);
    typed_access!(list, list_mut, List, VecDeque<Vec<u8>>);
    typed_access!(set, set_mut, Set, HashSet<Vec<u8>>);
    typed_access!(sorted_set, sorted_set_mut, SortedSet, Ranking<Vec<u8>>);
}

/// Item with its expiry.
#[derive(Debug, Clone)]
pub struct Entry {
    pub item: Item,
    pub expires_at: Instant,
}

impl Entry {
    pub fn new(item: Item, ttl: Duration) -> Self {
        Self {
            item,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn expire_in(&mut self, ttl: Duration) {
        self.expires_at = Instant::now() + ttl;
    }
}

/// Parse a stored scalar as a base-10 signed integer.
pub fn parse_integer(bytes: &[u8]) -> Result<i64, EngineError> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
        .ok_or(EngineError::NotAnInteger)
}

/// Add `amount` to an optional stored integer; absent counts as 0.
pub fn add_to_integer(current: Option<&[u8]>, amount: i64) -> Result<i64, EngineError> {
    let base = current.map(parse_integer).transpose()?.unwrap_or(0);
    base.checked_add(amount).ok_or(EngineError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_type() {
        let item = Item::Scalar(b"v".to_vec());
        assert_eq!(
            item.list().unwrap_err(),
            EngineError::WrongType {
                expected: ItemType::List,
                actual: ItemType::Scalar,
            }
        );
        assert!(item.scalar().is_ok());
    }

    #[test]
    fn test_integer_parsing() {
        assert_eq!(parse_integer(b"-42").unwrap(), -42);
        assert_eq!(parse_integer(b"abcxyz"), Err(EngineError::NotAnInteger));
        assert_eq!(parse_integer(b"1.5"), Err(EngineError::NotAnInteger));
        assert_eq!(add_to_integer(None, 5).unwrap(), 5);
        assert_eq!(add_to_integer(Some(&b"10"[..]), -3).unwrap(), 7);
        assert_eq!(
            add_to_integer(Some(i64::MAX.to_string().as_bytes()), 1),
            Err(EngineError::Overflow)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiry() {
        let entry = Entry::new(Item::Scalar(vec![]), Duration::from_secs(2));
        assert!(!entry.is_expired());
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(entry.remaining(), Duration::from_secs(1));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(entry.is_expired());
    }
}
