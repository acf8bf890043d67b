//! Transport boundary
//!
//! The client core never speaks a wire protocol. It hands an operation
//! descriptor to a [`Transport`] and gets back a [`RawOutcome`]: either a
//! payload or a failure carrying the transport's status class.

use crate::request::{Payload, Request};
use async_trait::async_trait;
use std::fmt;

/// Result of a single remote invocation.
pub type RawOutcome = Result<Payload, TransportFailure>;

/// Executes operation descriptors against the cache service.
///
/// Implementations own connection management, retries and deadlines. A
/// deadline that expires must be reported as a failure with
/// [`TransportStatus::DeadlineExceeded`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke one remote operation.
    async fn invoke(&self, request: Request) -> RawOutcome;
}

/// Status classes a transport may report (gRPC numbering).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportStatus {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl TransportStatus {
    /// Decode a numeric status code. Unknown numbers return `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        let status = match code {
            0 => Self::Ok,
            1 => Self::Cancelled,
            2 => Self::Unknown,
            3 => Self::InvalidArgument,
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            10 => Self::Aborted,
            11 => Self::OutOfRange,
            12 => Self::Unimplemented,
            13 => Self::Internal,
            14 => Self::Unavailable,
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            _ => return None,
        };
        Some(status)
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Metadata values a service attaches to `NotFound` failures to say which
/// resource was missing.
pub mod not_found {
    pub const CACHE: &str = "cache_not_found";
    pub const STORE: &str = "store_not_found";
    pub const ITEM: &str = "item_not_found";
}

/// A failed invocation as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub status: TransportStatus,
    pub message: String,
    /// Optional service-defined detail (see [`not_found`]).
    pub metadata: Option<String>,
}

impl TransportFailure {
    pub fn new(status: TransportStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Shorthand for a deadline expiry reported by the transport.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportStatus::DeadlineExceeded, message)
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip() {
        for code in 0..=16u8 {
            let status = TransportStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert_eq!(TransportStatus::from_code(17), None);
    }

    #[test]
    fn test_failure_display() {
        let failure = TransportFailure::new(TransportStatus::Unavailable, "connection reset");
        assert_eq!(failure.to_string(), "Unavailable: connection reset");
    }

    #[test]
    fn test_failure_metadata() {
        let failure = TransportFailure::new(TransportStatus::NotFound, "missing")
            .with_metadata(not_found::STORE);
        assert_eq!(failure.metadata.as_deref(), Some("store_not_found"));
    }
}
