//! Client core for the ouroboros cache service
//!
//! # Features
//! - Closed outcome enums per operation (`Hit`/`Miss`, `Stored`/`NotStored`, ...)
//! - Stable error taxonomy with local argument validation
//! - Scalar, dictionary, list, set and sorted-set operations with collection TTL
//! - Leaderboards, typed stores, vector indexes and webhooks
//! - Pluggable [`Transport`] so the same client runs against any backend

#[macro_use]
pub mod responses;

pub mod client;
pub mod config;
pub mod error;
pub mod range;
pub mod request;
pub mod transport;
pub mod ttl;
pub mod types;
pub mod validation;

pub use client::{
    CacheClient, CacheClientBuilder, Leaderboard, LeaderboardFetchByScoreOptions, ListPushOptions,
    SearchOptions, SortedSetFetchByRankOptions, SortedSetFetchByScoreOptions, StoreClient,
    VectorIndexClient, WebhookClient,
};
pub use config::{
    CacheClientConfig, CredentialProvider, OperationRecord, OutcomeListener, OutcomeListeners,
};
pub use error::{classify, ErrorCode, SdkError};
pub use range::{resolve_range, MAX_RANGE_WINDOW};
pub use request::{
    CacheCommand, ControlCommand, LeaderboardCommand, Payload, PayloadKind, Request,
    SetCondition, StoreCommand, VectorCommand, WebhookCommand,
};
pub use responses::*;
pub use transport::{not_found, RawOutcome, Transport, TransportFailure, TransportStatus};
pub use ttl::{effective_ttl, CollectionTtl, TtlPolicy};
pub use types::{
    ByteLike, CacheInfo, CacheValue, ItemType, ListEnd, Metadata, MetadataSelection,
    MetadataValue, RankedElement, ScoredElement, SearchHit, SimilarityMetric, SortOrder,
    StoreInfo, StoreValue, VectorIndexInfo, VectorItem, Webhook, WebhookSecret,
};
