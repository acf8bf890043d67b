//! Vector indexes

use super::Dispatcher;
use crate::error::{ErrorCode, SdkError};
use crate::request::{ControlCommand, Payload, Request, VectorCommand};
use crate::responses::{
    CreateVectorIndex, DeleteVectorIndex, ListVectorIndexes, VectorCountItems,
    VectorDeleteItemBatch, VectorGetItemBatch, VectorGetItemMetadataBatch, VectorSearch,
    VectorSearchAndFetchVectors, VectorUpsertItemBatch,
};
use crate::types::{MetadataSelection, SearchHit, SimilarityMetric, VectorItem};
use crate::validation::{validate_index_name, validate_num_dimensions, validate_top_k};

/// Search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub top_k: u32,
    pub metadata_fields: MetadataSelection,
    /// Hits scoring below this are dropped.
    pub score_threshold: Option<f64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: 10,
            metadata_fields: MetadataSelection::None,
            score_threshold: None,
        }
    }
}

impl SearchOptions {
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn metadata_fields(mut self, selection: MetadataSelection) -> Self {
        self.metadata_fields = selection;
        self
    }

    pub fn score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }
}

/// Client for vector index resources. Obtained from
/// [`CacheClient::vector_index_client`](super::CacheClient::vector_index_client).
#[derive(Clone)]
pub struct VectorIndexClient {
    dispatcher: Dispatcher,
}

impl VectorIndexClient {
    pub(crate) fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn create_index(
        &self,
        index_name: &str,
        num_dimensions: u32,
        metric: SimilarityMetric,
    ) -> CreateVectorIndex {
        self.dispatcher
            .call_with(
                "create_index",
                index_name,
                || {
                    validate_index_name(index_name)?;
                    validate_num_dimensions(num_dimensions)?;
                    Ok(Request::Control(ControlCommand::CreateIndex {
                        name: index_name.to_string(),
                        num_dimensions,
                        metric,
                    }))
                },
                |payload| matches!(payload, Payload::Unit).then_some(CreateVectorIndex::Success),
                |err| match err.code() {
                    ErrorCode::AlreadyExists => CreateVectorIndex::AlreadyExists,
                    _ => CreateVectorIndex::Error(err),
                },
            )
            .await
    }

    pub async fn delete_index(&self, index_name: &str) -> DeleteVectorIndex {
        self.dispatcher
            .call(
                "delete_index",
                index_name,
                || {
                    validate_index_name(index_name)?;
                    Ok(Request::Control(ControlCommand::DeleteIndex {
                        name: index_name.to_string(),
                    }))
                },
                |payload| matches!(payload, Payload::Unit).then_some(DeleteVectorIndex::Success),
            )
            .await
    }

    pub async fn list_indexes(&self) -> ListVectorIndexes {
        self.dispatcher
            .call(
                "list_indexes",
                "",
                || Ok(Request::Control(ControlCommand::ListIndexes)),
                |payload| match payload {
                    Payload::Indexes(indexes) => Some(ListVectorIndexes::Success(indexes)),
                    _ => None,
                },
            )
            .await
    }

    fn request(index_name: &str, command: VectorCommand) -> Result<Request, SdkError> {
        validate_index_name(index_name)?;
        Ok(Request::VectorIndex {
            index_name: index_name.to_string(),
            command,
        })
    }

    pub async fn count_items(&self, index_name: &str) -> VectorCountItems {
        self.dispatcher
            .call(
                "count_items",
                index_name,
                || Self::request(index_name, VectorCommand::CountItems),
                |payload| match payload {
                    Payload::Count(n) => Some(VectorCountItems::Success(n)),
                    _ => None,
                },
            )
            .await
    }

    /// Insert items, replacing any with the same id.
    pub async fn upsert_item_batch(
        &self,
        index_name: &str,
        items: impl IntoIterator<Item = VectorItem>,
    ) -> VectorUpsertItemBatch {
        let items: Vec<VectorItem> = items.into_iter().collect();
        self.dispatcher
            .call(
                "upsert_item_batch",
                index_name,
                || Self::request(index_name, VectorCommand::UpsertItems { items }),
                |payload| matches!(payload, Payload::Unit).then_some(VectorUpsertItemBatch::Success),
            )
            .await
    }

    pub async fn delete_item_batch<S: Into<String>>(
        &self,
        index_name: &str,
        ids: impl IntoIterator<Item = S>,
    ) -> VectorDeleteItemBatch {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        self.dispatcher
            .call(
                "delete_item_batch",
                index_name,
                || Self::request(index_name, VectorCommand::DeleteItems { ids }),
                |payload| matches!(payload, Payload::Unit).then_some(VectorDeleteItemBatch::Success),
            )
            .await
    }

    /// The `top_k` items most similar to `query`, best first.
    pub async fn search(
        &self,
        index_name: &str,
        query: Vec<f32>,
        options: SearchOptions,
    ) -> VectorSearch {
        self.dispatcher
            .call(
                "search",
                index_name,
                || Self::search_request(index_name, query, options, false),
                |payload| match payload {
                    Payload::SearchHits(hits) => Some(VectorSearch::Success(hits)),
                    _ => None,
                },
            )
            .await
    }

    /// Like [`VectorIndexClient::search`], returning each hit's vector too.
    pub async fn search_and_fetch_vectors(
        &self,
        index_name: &str,
        query: Vec<f32>,
        options: SearchOptions,
    ) -> VectorSearchAndFetchVectors {
        self.dispatcher
            .call(
                "search_and_fetch_vectors",
                index_name,
                || Self::search_request(index_name, query, options, true),
                |payload| match payload {
                    Payload::SearchHits(hits) if hits.iter().all(|h: &SearchHit| h.vector.is_some()) => {
                        Some(VectorSearchAndFetchVectors::Success(hits))
                    }
                    _ => None,
                },
            )
            .await
    }

    fn search_request(
        index_name: &str,
        query: Vec<f32>,
        options: SearchOptions,
        include_vectors: bool,
    ) -> Result<Request, SdkError> {
        validate_top_k(options.top_k)?;
        if let Some(threshold) = options.score_threshold {
            if threshold.is_nan() {
                return Err(SdkError::invalid_argument("score threshold must not be NaN"));
            }
        }
        Self::request(
            index_name,
            VectorCommand::Search {
                query,
                top_k: options.top_k,
                metadata: options.metadata_fields,
                score_threshold: options.score_threshold,
                include_vectors,
            },
        )
    }

    /// Items keyed by id; unknown ids are absent from the map.
    pub async fn get_item_batch<S: Into<String>>(
        &self,
        index_name: &str,
        ids: impl IntoIterator<Item = S>,
    ) -> VectorGetItemBatch {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        self.dispatcher
            .call(
                "get_item_batch",
                index_name,
                || {
                    Self::request(
                        index_name,
                        VectorCommand::GetItems {
                            ids,
                            metadata_only: false,
                        },
                    )
                },
                |payload| match payload {
                    Payload::VectorItems(items) => Some(VectorGetItemBatch::Success(
                        items.into_iter().map(|item| (item.id.clone(), item)).collect(),
                    )),
                    _ => None,
                },
            )
            .await
    }

    /// Metadata keyed by id; unknown ids are absent from the map.
    pub async fn get_item_metadata_batch<S: Into<String>>(
        &self,
        index_name: &str,
        ids: impl IntoIterator<Item = S>,
    ) -> VectorGetItemMetadataBatch {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        self.dispatcher
            .call(
                "get_item_metadata_batch",
                index_name,
                || {
                    Self::request(
                        index_name,
                        VectorCommand::GetItems {
                            ids,
                            metadata_only: true,
                        },
                    )
                },
                |payload| match payload {
                    Payload::VectorItems(items) => Some(VectorGetItemMetadataBatch::Success(
                        items.into_iter().map(|item| (item.id, item.metadata)).collect(),
                    )),
                    _ => None,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::responses::Outcome;
    use crate::transport::{TransportFailure, TransportStatus};

    #[tokio::test]
    async fn test_create_index_validation_and_conflict() {
        let transport = ScriptedTransport::answering(vec![Err(TransportFailure::new(
            TransportStatus::AlreadyExists,
            "index exists",
        ))]);
        let vectors = client(transport.clone()).vector_index_client();

        assert!(vectors
            .create_index("idx", 0, SimilarityMetric::CosineSimilarity)
            .await
            .is_error());
        assert_eq!(transport.request_count(), 0);

        assert_eq!(
            vectors
                .create_index("idx", 2, SimilarityMetric::CosineSimilarity)
                .await,
            CreateVectorIndex::AlreadyExists
        );
    }

    #[tokio::test]
    async fn test_zero_top_k_is_invalid() {
        let transport = ScriptedTransport::answering(vec![]);
        let vectors = client(transport.clone()).vector_index_client();
        let outcome = vectors
            .search("idx", vec![1.0, 0.0], SearchOptions::default().top_k(0))
            .await;
        assert_eq!(
            outcome.error().map(|e| e.message().to_string()).as_deref(),
            Some("topK must be greater than zero")
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_get_item_batch_keys_by_id() {
        let transport = ScriptedTransport::answering(vec![Ok(Payload::VectorItems(vec![
            VectorItem::new("a", vec![1.0]),
        ]))]);
        let vectors = client(transport).vector_index_client();
        let outcome = vectors.get_item_batch("idx", ["a", "missing"]).await;
        let items = outcome.values().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items["a"].vector, vec![1.0]);
    }
}
