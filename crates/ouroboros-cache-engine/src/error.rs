//! Engine error types

use ouroboros_cache::{not_found, ItemType, TransportFailure, TransportStatus};
use thiserror::Error;

/// Errors raised while executing an operation descriptor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Cache not found: {0}")]
    CacheNotFound(String),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Item not found in store: {0}")]
    StoreItemNotFound(String),

    #[error("Vector index not found: {0}")]
    IndexNotFound(String),

    #[error("Webhook not found: {0}")]
    WebhookNotFound(String),

    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("Type mismatch: expected {expected:?}, got {actual:?}")]
    WrongType { expected: ItemType, actual: ItemType },

    #[error("Value is not a base-10 integer")]
    NotAnInteger,

    #[error("Increment would overflow")]
    Overflow,

    #[error("Vector has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: u32, actual: usize },

    #[error("{0}")]
    InvalidArgument(String),
}

impl EngineError {
    /// Status the service reports for this failure.
    pub fn status(&self) -> TransportStatus {
        match self {
            EngineError::CacheNotFound(_)
            | EngineError::StoreNotFound(_)
            | EngineError::StoreItemNotFound(_)
            | EngineError::IndexNotFound(_)
            | EngineError::WebhookNotFound(_) => TransportStatus::NotFound,
            EngineError::AlreadyExists { .. } => TransportStatus::AlreadyExists,
            EngineError::WrongType { .. } | EngineError::NotAnInteger | EngineError::Overflow => {
                TransportStatus::FailedPrecondition
            }
            EngineError::DimensionMismatch { .. } | EngineError::InvalidArgument(_) => {
                TransportStatus::InvalidArgument
            }
        }
    }

    fn metadata(&self) -> Option<&'static str> {
        match self {
            EngineError::CacheNotFound(_) => Some(not_found::CACHE),
            EngineError::StoreNotFound(_) => Some(not_found::STORE),
            EngineError::StoreItemNotFound(_) => Some(not_found::ITEM),
            _ => None,
        }
    }
}

impl From<EngineError> for TransportFailure {
    fn from(err: EngineError) -> Self {
        let failure = TransportFailure::new(err.status(), err.to_string());
        match err.metadata() {
            Some(metadata) => failure.with_metadata(metadata),
            None => failure,
        }
    }
}
