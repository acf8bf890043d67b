//! Operation descriptors and raw payloads
//!
//! A [`Request`] is a fully validated description of one remote operation.
//! The transport answers with a [`Payload`] whose shape depends on the
//! operation; the client turns that into the typed outcome.

use crate::ttl::TtlPolicy;
use crate::types::{
    CacheInfo, ItemType, ListEnd, MetadataSelection, RankedElement, ScoredElement,
    SearchHit, SimilarityMetric, SortOrder, StoreInfo, StoreValue, VectorIndexInfo, VectorItem,
    Webhook, WebhookSecret,
};
use std::time::Duration;

/// Precondition of a conditional set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetCondition {
    /// Key absent.
    Absent,
    /// Key present.
    Present,
    /// Key present and current value equals the operand.
    Equal(Vec<u8>),
    /// Key absent, or current value differs from the operand.
    NotEqual(Vec<u8>),
    /// Key present and current value differs from the operand.
    PresentAndNotEqual(Vec<u8>),
    /// Key absent, or current value equals the operand.
    AbsentOrEqual(Vec<u8>),
}

impl SetCondition {
    /// Evaluate against the current value (`None` when the key is absent).
    pub fn holds(&self, current: Option<&[u8]>) -> bool {
        match (self, current) {
            (SetCondition::Absent, current) => current.is_none(),
            (SetCondition::Present, current) => current.is_some(),
            (SetCondition::Equal(expected), Some(value)) => value == expected.as_slice(),
            (SetCondition::Equal(_), None) => false,
            (SetCondition::NotEqual(expected), Some(value)) => value != expected.as_slice(),
            (SetCondition::NotEqual(_), None) => true,
            (SetCondition::PresentAndNotEqual(expected), Some(value)) => {
                value != expected.as_slice()
            }
            (SetCondition::PresentAndNotEqual(_), None) => false,
            (SetCondition::AbsentOrEqual(expected), Some(value)) => value == expected.as_slice(),
            (SetCondition::AbsentOrEqual(_), None) => true,
        }
    }
}

/// One remote operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Control(ControlCommand),
    Cache {
        cache_name: String,
        command: CacheCommand,
    },
    Leaderboard {
        cache_name: String,
        leaderboard: String,
        command: LeaderboardCommand,
    },
    Store {
        store_name: String,
        command: StoreCommand,
    },
    VectorIndex {
        index_name: String,
        command: VectorCommand,
    },
    Webhook {
        cache_name: String,
        command: WebhookCommand,
    },
}

impl Request {
    pub fn cache(cache_name: &str, command: CacheCommand) -> Self {
        Request::Cache {
            cache_name: cache_name.to_string(),
            command,
        }
    }
}

/// Resource lifecycle operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    CreateCache { name: String },
    DeleteCache { name: String },
    ListCaches,
    FlushCache { name: String },
    CreateStore { name: String },
    DeleteStore { name: String },
    ListStores,
    CreateIndex {
        name: String,
        num_dimensions: u32,
        metric: SimilarityMetric,
    },
    DeleteIndex { name: String },
    ListIndexes,
}

/// Operations on items inside one cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheCommand {
    // scalar
    Get { key: Vec<u8> },
    Set { key: Vec<u8>, value: Vec<u8>, ttl: Duration },
    SetIf {
        key: Vec<u8>,
        value: Vec<u8>,
        condition: SetCondition,
        ttl: Duration,
    },
    Delete { key: Vec<u8> },
    Increment { key: Vec<u8>, amount: i64, ttl: Duration },
    KeysExist { keys: Vec<Vec<u8>> },
    ItemGetType { key: Vec<u8> },
    ItemGetTtl { key: Vec<u8> },
    UpdateTtl { key: Vec<u8>, ttl: Duration },
    IncreaseTtl { key: Vec<u8>, ttl: Duration },
    DecreaseTtl { key: Vec<u8>, ttl: Duration },

    // dictionary
    DictionaryFetch { dictionary: Vec<u8> },
    DictionaryGetFields { dictionary: Vec<u8>, fields: Vec<Vec<u8>> },
    DictionarySetFields {
        dictionary: Vec<u8>,
        fields: Vec<(Vec<u8>, Vec<u8>)>,
        ttl: TtlPolicy,
    },
    DictionaryRemoveFields { dictionary: Vec<u8>, fields: Vec<Vec<u8>> },
    DictionaryIncrement {
        dictionary: Vec<u8>,
        field: Vec<u8>,
        amount: i64,
        ttl: TtlPolicy,
    },
    DictionaryLength { dictionary: Vec<u8> },

    // list
    ListFetch {
        list: Vec<u8>,
        start: Option<i32>,
        end: Option<i32>,
    },
    ListLength { list: Vec<u8> },
    /// Push one or more values at `end`, then trim the opposite end.
    ListConcatenate {
        list: Vec<u8>,
        values: Vec<Vec<u8>>,
        end: ListEnd,
        truncate_to_size: Option<u32>,
        ttl: TtlPolicy,
    },
    ListPop { list: Vec<u8>, end: ListEnd },
    ListRemoveValue { list: Vec<u8>, value: Vec<u8> },
    ListRetain {
        list: Vec<u8>,
        start: Option<i32>,
        end: Option<i32>,
        ttl: TtlPolicy,
    },

    // set
    SetAddElements {
        set: Vec<u8>,
        elements: Vec<Vec<u8>>,
        ttl: TtlPolicy,
    },
    SetRemoveElements { set: Vec<u8>, elements: Vec<Vec<u8>> },
    SetFetch { set: Vec<u8> },
    SetContainsElements { set: Vec<u8>, elements: Vec<Vec<u8>> },
    SetLength { set: Vec<u8> },
    SetSample { set: Vec<u8>, limit: u32 },
    SetPop { set: Vec<u8>, count: u32 },

    // sorted set
    SortedSetPutElements {
        sorted_set: Vec<u8>,
        elements: Vec<(Vec<u8>, f64)>,
        ttl: TtlPolicy,
    },
    SortedSetFetchByRank {
        sorted_set: Vec<u8>,
        start: Option<i32>,
        end: Option<i32>,
        order: SortOrder,
    },
    SortedSetFetchByScore {
        sorted_set: Vec<u8>,
        min_score: Option<f64>,
        max_score: Option<f64>,
        order: SortOrder,
        offset: Option<u32>,
        count: Option<u32>,
    },
    SortedSetGetRank {
        sorted_set: Vec<u8>,
        value: Vec<u8>,
        order: SortOrder,
    },
    SortedSetGetScores { sorted_set: Vec<u8>, values: Vec<Vec<u8>> },
    SortedSetIncrementScore {
        sorted_set: Vec<u8>,
        value: Vec<u8>,
        amount: f64,
        ttl: TtlPolicy,
    },
    SortedSetRemoveElements { sorted_set: Vec<u8>, values: Vec<Vec<u8>> },
    SortedSetLength { sorted_set: Vec<u8> },
    SortedSetLengthByScore {
        sorted_set: Vec<u8>,
        min_score: Option<f64>,
        max_score: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardCommand {
    Upsert { elements: Vec<(u64, f64)> },
    FetchByScore {
        min_score: Option<f64>,
        max_score: Option<f64>,
        order: SortOrder,
        offset: u32,
        count: u32,
    },
    FetchByRank { start: u32, end: u32, order: SortOrder },
    GetRank { ids: Vec<u64>, order: SortOrder },
    Length,
    RemoveElements { ids: Vec<u64> },
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    Get { key: String },
    Put { key: String, value: StoreValue },
    Delete { key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum VectorCommand {
    CountItems,
    UpsertItems { items: Vec<VectorItem> },
    DeleteItems { ids: Vec<String> },
    Search {
        query: Vec<f32>,
        top_k: u32,
        metadata: MetadataSelection,
        score_threshold: Option<f64>,
        include_vectors: bool,
    },
    GetItems { ids: Vec<String>, metadata_only: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookCommand {
    Put {
        name: String,
        topic_name: String,
        destination: String,
    },
    Delete { name: String },
    List,
    GetSecret { name: String },
    RotateSecret { name: String },
}

/// Successful answer from the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Operation applied; nothing to return.
    Unit,
    /// Addressed item (or collection) does not exist.
    Miss,
    Value(Vec<u8>),
    Integer(i64),
    Float(f64),
    Length(u32),
    Count(u64),
    Flag(bool),
    Flags(Vec<bool>),
    Values(Vec<Vec<u8>>),
    OptionalValues(Vec<Option<Vec<u8>>>),
    Pairs(Vec<(Vec<u8>, Vec<u8>)>),
    Scored(Vec<ScoredElement>),
    Rank(u64),
    Ranked(Vec<RankedElement>),
    ItemType(ItemType),
    Ttl(Duration),
    Caches(Vec<CacheInfo>),
    Stores(Vec<StoreInfo>),
    StoreValue(StoreValue),
    Indexes(Vec<VectorIndexInfo>),
    SearchHits(Vec<SearchHit>),
    VectorItems(Vec<VectorItem>),
    Webhooks(Vec<Webhook>),
    Secret(WebhookSecret),
}

/// Payload shape, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Unit,
    Miss,
    Value,
    Integer,
    Float,
    Length,
    Count,
    Flag,
    Flags,
    Values,
    OptionalValues,
    Pairs,
    Scored,
    Rank,
    Ranked,
    ItemType,
    Ttl,
    Caches,
    Stores,
    StoreValue,
    Indexes,
    SearchHits,
    VectorItems,
    Webhooks,
    Secret,
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Unit => PayloadKind::Unit,
            Payload::Miss => PayloadKind::Miss,
            Payload::Value(_) => PayloadKind::Value,
            Payload::Integer(_) => PayloadKind::Integer,
            Payload::Float(_) => PayloadKind::Float,
            Payload::Length(_) => PayloadKind::Length,
            Payload::Count(_) => PayloadKind::Count,
            Payload::Flag(_) => PayloadKind::Flag,
            Payload::Flags(_) => PayloadKind::Flags,
            Payload::Values(_) => PayloadKind::Values,
            Payload::OptionalValues(_) => PayloadKind::OptionalValues,
            Payload::Pairs(_) => PayloadKind::Pairs,
            Payload::Scored(_) => PayloadKind::Scored,
            Payload::Rank(_) => PayloadKind::Rank,
            Payload::Ranked(_) => PayloadKind::Ranked,
            Payload::ItemType(_) => PayloadKind::ItemType,
            Payload::Ttl(_) => PayloadKind::Ttl,
            Payload::Caches(_) => PayloadKind::Caches,
            Payload::Stores(_) => PayloadKind::Stores,
            Payload::StoreValue(_) => PayloadKind::StoreValue,
            Payload::Indexes(_) => PayloadKind::Indexes,
            Payload::SearchHits(_) => PayloadKind::SearchHits,
            Payload::VectorItems(_) => PayloadKind::VectorItems,
            Payload::Webhooks(_) => PayloadKind::Webhooks,
            Payload::Secret(_) => PayloadKind::Secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V: &[u8] = b"current";

    fn cond(f: fn(Vec<u8>) -> SetCondition, operand: &[u8]) -> SetCondition {
        f(operand.to_vec())
    }

    #[test]
    fn test_absent_and_present() {
        assert!(SetCondition::Absent.holds(None));
        assert!(!SetCondition::Absent.holds(Some(V)));
        assert!(SetCondition::Present.holds(Some(V)));
        assert!(!SetCondition::Present.holds(None));
    }

    #[test]
    fn test_equal() {
        assert!(cond(SetCondition::Equal, V).holds(Some(V)));
        assert!(!cond(SetCondition::Equal, b"other").holds(Some(V)));
        assert!(!cond(SetCondition::Equal, V).holds(None));
    }

    #[test]
    fn test_not_equal() {
        assert!(cond(SetCondition::NotEqual, b"other").holds(Some(V)));
        assert!(!cond(SetCondition::NotEqual, V).holds(Some(V)));
        assert!(cond(SetCondition::NotEqual, V).holds(None));
    }

    #[test]
    fn test_present_and_not_equal() {
        assert!(cond(SetCondition::PresentAndNotEqual, b"other").holds(Some(V)));
        assert!(!cond(SetCondition::PresentAndNotEqual, V).holds(Some(V)));
        assert!(!cond(SetCondition::PresentAndNotEqual, V).holds(None));
    }

    #[test]
    fn test_absent_or_equal() {
        assert!(cond(SetCondition::AbsentOrEqual, V).holds(Some(V)));
        assert!(!cond(SetCondition::AbsentOrEqual, b"other").holds(Some(V)));
        assert!(cond(SetCondition::AbsentOrEqual, V).holds(None));
    }

    #[test]
    fn test_payload_kind() {
        assert_eq!(Payload::Miss.kind(), PayloadKind::Miss);
        assert_eq!(Payload::Value(vec![1]).kind(), PayloadKind::Value);
        assert_eq!(Payload::Flags(vec![]).kind(), PayloadKind::Flags);
    }
}
