//! Vector indexes with brute-force similarity search

use crate::error::EngineError;
use ouroboros_cache::{
    Payload, SearchHit, SimilarityMetric, VectorCommand, VectorIndexInfo, VectorItem,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Similarity of two equal-length vectors; higher is closer.
pub fn similarity(metric: SimilarityMetric, a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    match metric {
        SimilarityMetric::InnerProduct => dot,
        SimilarityMetric::CosineSimilarity => {
            let norm = |v: &[f32]| v.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
            let denominator = norm(a) * norm(b);
            if denominator == 0.0 {
                0.0
            } else {
                dot / denominator
            }
        }
        SimilarityMetric::EuclideanSimilarity => -a
            .iter()
            .zip(b)
            .map(|(x, y)| (f64::from(*x) - f64::from(*y)).powi(2))
            .sum::<f64>(),
    }
}

struct VectorIndex {
    num_dimensions: u32,
    metric: SimilarityMetric,
    /// Insertion order; ties in search keep it.
    items: Vec<VectorItem>,
}

impl VectorIndex {
    fn check_dimensions(&self, vector: &[f32]) -> Result<(), EngineError> {
        if vector.len() != self.num_dimensions as usize {
            return Err(EngineError::DimensionMismatch {
                expected: self.num_dimensions,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn upsert(&mut self, item: VectorItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }
}

#[derive(Default)]
pub struct VectorIndexes {
    indexes: RwLock<BTreeMap<String, VectorIndex>>,
}

impl VectorIndexes {
    pub fn create(
        &self,
        name: &str,
        num_dimensions: u32,
        metric: SimilarityMetric,
    ) -> Result<(), EngineError> {
        let mut indexes = self.indexes.write();
        if indexes.contains_key(name) {
            return Err(EngineError::AlreadyExists {
                kind: "Vector index",
                name: name.to_string(),
            });
        }
        indexes.insert(
            name.to_string(),
            VectorIndex {
                num_dimensions,
                metric,
                items: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<(), EngineError> {
        self.indexes
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| EngineError::IndexNotFound(name.to_string()))
    }

    /// Indexes ordered by name.
    pub fn list(&self) -> Vec<VectorIndexInfo> {
        self.indexes
            .read()
            .iter()
            .map(|(name, index)| VectorIndexInfo {
                name: name.clone(),
                num_dimensions: index.num_dimensions,
                similarity_metric: index.metric,
            })
            .collect()
    }

    pub fn apply(&self, name: &str, command: VectorCommand) -> Result<Payload, EngineError> {
        let missing = || EngineError::IndexNotFound(name.to_string());
        match command {
            VectorCommand::UpsertItems { items } => {
                let mut indexes = self.indexes.write();
                let index = indexes.get_mut(name).ok_or_else(missing)?;
                items
                    .iter()
                    .try_for_each(|item| index.check_dimensions(&item.vector))?;
                items.into_iter().for_each(|item| index.upsert(item));
                Ok(Payload::Unit)
            }
            VectorCommand::DeleteItems { ids } => {
                let mut indexes = self.indexes.write();
                let index = indexes.get_mut(name).ok_or_else(missing)?;
                index.items.retain(|item| !ids.contains(&item.id));
                Ok(Payload::Unit)
            }
            command => {
                let indexes = self.indexes.read();
                let index = indexes.get(name).ok_or_else(missing)?;
                read(index, command)
            }
        }
    }
}

fn read(index: &VectorIndex, command: VectorCommand) -> Result<Payload, EngineError> {
    match command {
        VectorCommand::CountItems => Ok(Payload::Count(index.items.len() as u64)),
        VectorCommand::Search {
            query,
            top_k,
            metadata,
            score_threshold,
            include_vectors,
        } => {
            index.check_dimensions(&query)?;
            let mut hits: Vec<SearchHit> = index
                .items
                .iter()
                .map(|item| SearchHit {
                    id: item.id.clone(),
                    score: similarity(index.metric, &query, &item.vector),
                    metadata: metadata.project(&item.metadata),
                    vector: include_vectors.then(|| item.vector.clone()),
                })
                .filter(|hit| score_threshold.map_or(true, |t| hit.score >= t))
                .collect();
            hits.sort_by(|a, b| b.score.total_cmp(&a.score));
            hits.truncate(top_k as usize);
            Ok(Payload::SearchHits(hits))
        }
        VectorCommand::GetItems { ids, metadata_only } => Ok(Payload::VectorItems(
            ids.iter()
                .filter_map(|id| index.items.iter().find(|item| &item.id == id))
                .map(|item| VectorItem {
                    id: item.id.clone(),
                    vector: if metadata_only {
                        Vec::new()
                    } else {
                        item.vector.clone()
                    },
                    metadata: item.metadata.clone(),
                })
                .collect(),
        )),
        VectorCommand::UpsertItems { .. } | VectorCommand::DeleteItems { .. } => Err(
            EngineError::InvalidArgument("write command routed to a read".to_string()),
        ),
    }
}
