use crate::types::{Metadata, SearchHit, VectorIndexInfo, VectorItem};
use std::collections::HashMap;

outcome! {
    pub enum CreateVectorIndex {
        Success,
        AlreadyExists,
    }
}

outcome! {
    pub enum DeleteVectorIndex {
        Success,
    }
}

outcome! {
    pub enum ListVectorIndexes {
        Success(Vec<VectorIndexInfo>),
    }
}

impl ListVectorIndexes {
    pub fn indexes(&self) -> Option<&[VectorIndexInfo]> {
        match self {
            ListVectorIndexes::Success(indexes) => Some(indexes),
            _ => None,
        }
    }
}

outcome! {
    pub enum VectorCountItems {
        Success(u64),
    }
}

impl VectorCountItems {
    pub fn item_count(&self) -> Option<u64> {
        match self {
            VectorCountItems::Success(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    pub enum VectorUpsertItemBatch {
        Success,
    }
}

outcome! {
    pub enum VectorDeleteItemBatch {
        Success,
    }
}

outcome! {
    /// Hits ordered from most to least similar.
    pub enum VectorSearch {
        Success(Vec<SearchHit>),
    }
}

impl VectorSearch {
    pub fn hits(&self) -> Option<&[SearchHit]> {
        match self {
            VectorSearch::Success(hits) => Some(hits),
            _ => None,
        }
    }
}

outcome! {
    /// Like [`VectorSearch`], with each hit's vector populated.
    pub enum VectorSearchAndFetchVectors {
        Success(Vec<SearchHit>),
    }
}

impl VectorSearchAndFetchVectors {
    pub fn hits(&self) -> Option<&[SearchHit]> {
        match self {
            VectorSearchAndFetchVectors::Success(hits) => Some(hits),
            _ => None,
        }
    }
}

outcome! {
    /// Items found, keyed by id; missing ids are absent from the map.
    pub enum VectorGetItemBatch {
        Success(HashMap<String, VectorItem>),
    }
}

impl VectorGetItemBatch {
    pub fn values(&self) -> Option<&HashMap<String, VectorItem>> {
        match self {
            VectorGetItemBatch::Success(items) => Some(items),
            _ => None,
        }
    }
}

outcome! {
    pub enum VectorGetItemMetadataBatch {
        Success(HashMap<String, Metadata>),
    }
}

impl VectorGetItemMetadataBatch {
    pub fn values(&self) -> Option<&HashMap<String, Metadata>> {
        match self {
            VectorGetItemMetadataBatch::Success(items) => Some(items),
            _ => None,
        }
    }
}
