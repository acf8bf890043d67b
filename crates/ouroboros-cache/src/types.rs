//! Value types shared by requests and outcomes

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A key, field or value supplied either as text or as raw bytes.
///
/// Both forms address the same underlying bytes: `"a"` and `b"a"` are the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ByteLike {
    Text(String),
    Raw(Vec<u8>),
}

impl ByteLike {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ByteLike::Text(s) => s.as_bytes(),
            ByteLike::Raw(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ByteLike::Text(s) => s.into_bytes(),
            ByteLike::Raw(b) => b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Empty, or text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            ByteLike::Text(s) => s.trim().is_empty(),
            ByteLike::Raw(b) => b.is_empty(),
        }
    }
}

impl From<&str> for ByteLike {
    fn from(value: &str) -> Self {
        ByteLike::Text(value.to_string())
    }
}

impl From<String> for ByteLike {
    fn from(value: String) -> Self {
        ByteLike::Text(value)
    }
}

impl From<&String> for ByteLike {
    fn from(value: &String) -> Self {
        ByteLike::Text(value.clone())
    }
}

impl From<&[u8]> for ByteLike {
    fn from(value: &[u8]) -> Self {
        ByteLike::Raw(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for ByteLike {
    fn from(value: &[u8; N]) -> Self {
        ByteLike::Raw(value.to_vec())
    }
}

impl From<Vec<u8>> for ByteLike {
    fn from(value: Vec<u8>) -> Self {
        ByteLike::Raw(value)
    }
}

impl From<&Vec<u8>> for ByteLike {
    fn from(value: &Vec<u8>) -> Self {
        ByteLike::Raw(value.clone())
    }
}

/// Bytes returned by the service, readable as text or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheValue(Vec<u8>);

impl CacheValue {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// UTF-8 view; invalid sequences are replaced.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Kind of item stored under a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Scalar,
    Dictionary,
    List,
    Set,
    SortedSet,
}

/// Order in which ranked collections are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Which end of a list an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListEnd {
    Front,
    Back,
}

impl ListEnd {
    pub fn opposite(&self) -> ListEnd {
        match self {
            ListEnd::Front => ListEnd::Back,
            ListEnd::Back => ListEnd::Front,
        }
    }
}

/// Sorted-set member with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredElement {
    pub value: CacheValue,
    pub score: f64,
}

impl ScoredElement {
    pub fn new(value: Vec<u8>, score: f64) -> Self {
        Self {
            value: CacheValue::new(value),
            score,
        }
    }
}

/// Leaderboard member: numeric id, score and rank under the requested order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedElement {
    pub id: u64,
    pub score: f64,
    pub rank: u64,
}

/// Typed value held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreValue {
    Int(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl StoreValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StoreValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            StoreValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoreValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            StoreValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheInfo {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
}

/// Similarity function a vector index ranks by. Higher scores are closer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimilarityMetric {
    #[default]
    CosineSimilarity,
    InnerProduct,
    /// Negated squared euclidean distance.
    EuclideanSimilarity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorIndexInfo {
    pub name: String,
    pub num_dimensions: u32,
    pub similarity_metric: SimilarityMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    StringList(Vec<String>),
}

pub type Metadata = HashMap<String, MetadataValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorItem {
    pub id: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl VectorItem {
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Which metadata fields a search returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MetadataSelection {
    #[default]
    None,
    All,
    Fields(Vec<String>),
}

impl MetadataSelection {
    /// Project `metadata` down to the selected fields.
    pub fn project(&self, metadata: &Metadata) -> Metadata {
        match self {
            MetadataSelection::None => Metadata::new(),
            MetadataSelection::All => metadata.clone(),
            MetadataSelection::Fields(fields) => fields
                .iter()
                .filter_map(|f| metadata.get(f).map(|v| (f.clone(), v.clone())))
                .collect(),
        }
    }
}

/// One search result. `vector` is only populated by fetch-vectors searches.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    pub metadata: Metadata,
    pub vector: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub cache_name: String,
    pub name: String,
    pub topic_name: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSecret {
    pub cache_name: String,
    pub webhook_name: String,
    pub secret: String,
}
