use crate::types::{CacheValue, ItemType};
use std::collections::HashMap;
use std::time::Duration;

outcome! {
    /// Outcome of a scalar `get`.
    pub enum CacheGet {
        Hit(CacheValue),
        Miss,
    }
}

impl CacheGet {
    /// Natural view of the value: text. `None` unless `Hit`.
    pub fn value(&self) -> Option<String> {
        self.value_string()
    }

    pub fn value_string(&self) -> Option<String> {
        match self {
            CacheGet::Hit(v) => Some(v.as_string()),
            _ => None,
        }
    }

    pub fn value_bytes(&self) -> Option<&[u8]> {
        match self {
            CacheGet::Hit(v) => Some(v.as_bytes()),
            _ => None,
        }
    }
}

outcome! {
    pub enum CacheSet {
        Success,
    }
}

outcome! {
    pub enum CacheDelete {
        Success,
    }
}

outcome! {
    /// Outcome of `increment`; carries the value after the increment.
    pub enum CacheIncrement {
        Success(i64),
    }
}

impl CacheIncrement {
    pub fn value(&self) -> Option<i64> {
        match self {
            CacheIncrement::Success(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    /// Outcome of every conditional set. `NotStored` means the precondition
    /// was false and nothing changed.
    pub enum CacheSetIf {
        Stored,
        NotStored,
    }
}

/// Per-key outcomes of `get_batch`, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct GetBatchResults {
    keys: Vec<CacheValue>,
    results: Vec<CacheGet>,
}

impl GetBatchResults {
    pub(crate) fn new(keys: Vec<CacheValue>, results: Vec<CacheGet>) -> Self {
        Self { keys, results }
    }

    /// Outcomes index-aligned with the requested keys.
    pub fn results(&self) -> &[CacheGet] {
        &self.results
    }

    /// Text key to text value for every hit.
    pub fn values(&self) -> HashMap<String, String> {
        self.keys
            .iter()
            .zip(&self.results)
            .filter_map(|(key, result)| result.value_string().map(|v| (key.as_string(), v)))
            .collect()
    }

    pub fn values_bytes(&self) -> HashMap<Vec<u8>, Vec<u8>> {
        self.keys
            .iter()
            .zip(&self.results)
            .filter_map(|(key, result)| {
                result
                    .value_bytes()
                    .map(|v| (key.as_bytes().to_vec(), v.to_vec()))
            })
            .collect()
    }
}

outcome! {
    /// Outcome of `get_batch`. A missing key is a `Miss` inside `Success`;
    /// `Error` means the batch as a whole failed.
    pub enum CacheGetBatch {
        Success(GetBatchResults),
    }
}

impl CacheGetBatch {
    pub fn results(&self) -> Option<&[CacheGet]> {
        match self {
            CacheGetBatch::Success(batch) => Some(batch.results()),
            _ => None,
        }
    }

    pub fn values(&self) -> Option<HashMap<String, String>> {
        match self {
            CacheGetBatch::Success(batch) => Some(batch.values()),
            _ => None,
        }
    }
}

outcome! {
    /// Outcome of `set_batch`; per-key outcomes in request order.
    pub enum CacheSetBatch {
        Success(Vec<CacheSet>),
    }
}

impl CacheSetBatch {
    pub fn results(&self) -> Option<&[CacheSet]> {
        match self {
            CacheSetBatch::Success(results) => Some(results),
            _ => None,
        }
    }
}

outcome! {
    pub enum CacheKeyExists {
        Success(bool),
    }
}

impl CacheKeyExists {
    pub fn exists(&self) -> Option<bool> {
        match self {
            CacheKeyExists::Success(exists) => Some(*exists),
            _ => None,
        }
    }
}

outcome! {
    /// Existence flags index-aligned with the requested keys.
    pub enum CacheKeysExist {
        Success(Vec<bool>),
    }
}

impl CacheKeysExist {
    pub fn exists(&self) -> Option<&[bool]> {
        match self {
            CacheKeysExist::Success(flags) => Some(flags),
            _ => None,
        }
    }
}

outcome! {
    pub enum CacheItemGetType {
        Hit(ItemType),
        Miss,
    }
}

impl CacheItemGetType {
    pub fn item_type(&self) -> Option<ItemType> {
        match self {
            CacheItemGetType::Hit(t) => Some(*t),
            _ => None,
        }
    }
}

outcome! {
    pub enum CacheItemGetTtl {
        Hit(Duration),
        Miss,
    }
}

impl CacheItemGetTtl {
    pub fn remaining_ttl(&self) -> Option<Duration> {
        match self {
            CacheItemGetTtl::Hit(ttl) => Some(*ttl),
            _ => None,
        }
    }
}

outcome! {
    /// Outcome of `update_ttl`.
    pub enum CacheUpdateTtl {
        Set,
        Miss,
    }
}

outcome! {
    /// Outcome of `increase_ttl` and `decrease_ttl`. `NotSet` means the new
    /// TTL would not move the deadline in the requested direction.
    pub enum CacheAdjustTtl {
        Set,
        NotSet,
        Miss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;

    fn hit(v: &str) -> CacheGet {
        CacheGet::Hit(CacheValue::new(v.as_bytes().to_vec()))
    }

    #[test]
    fn test_get_accessors() {
        let outcome = hit("v");
        assert_eq!(outcome.value().as_deref(), Some("v"));
        assert_eq!(outcome.value_bytes(), Some(&b"v"[..]));

        assert_eq!(CacheGet::Miss.value(), None);
        assert_eq!(CacheGet::Miss.value_bytes(), None);
        assert_eq!(CacheGet::from(SdkError::invalid_argument("x")).value(), None);
    }

    #[test]
    fn test_batch_values_only_include_hits() {
        let keys = ["a", "b", "c"]
            .iter()
            .map(|k| CacheValue::new(k.as_bytes().to_vec()))
            .collect();
        let batch = GetBatchResults::new(keys, vec![hit("1"), CacheGet::Miss, hit("3")]);

        let values = batch.values();
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("a").map(String::as_str), Some("1"));
        assert_eq!(values.get("c").map(String::as_str), Some("3"));
        assert_eq!(batch.results()[1], CacheGet::Miss);
        assert_eq!(batch.values_bytes().get(&b"a"[..].to_vec()), Some(&b"1".to_vec()));
    }

    #[test]
    fn test_ttl_accessors() {
        let ttl = CacheItemGetTtl::Hit(Duration::from_secs(3));
        assert_eq!(ttl.remaining_ttl(), Some(Duration::from_secs(3)));
        assert_eq!(CacheItemGetTtl::Miss.remaining_ttl(), None);
        assert_eq!(
            CacheItemGetType::Hit(ItemType::List).item_type(),
            Some(ItemType::List)
        );
    }
}
