//! Error taxonomy for cache operations
//!
//! Every failure, local or remote, is reported as an [`SdkError`] carrying a
//! canonical [`ErrorCode`]. Remote failures are classified from the
//! transport status alone; the mapping is total and has no side effects.

use crate::request::PayloadKind;
use crate::transport::{not_found, TransportFailure, TransportStatus};
use std::fmt;
use thiserror::Error;

/// Canonical error codes surfaced by every `Error` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    UnknownService,
    AlreadyExists,
    NotFound,
    StoreNotFound,
    StoreItemNotFound,
    InternalServer,
    Permission,
    Authentication,
    Cancelled,
    Connection,
    LimitExceeded,
    BadRequest,
    Timeout,
    ServerUnavailable,
    FailedPrecondition,
    Unknown,
}

impl ErrorCode {
    /// Stable identifier, suitable for assertions and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT_ERROR",
            ErrorCode::UnknownService => "UNKNOWN_SERVICE_ERROR",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS_ERROR",
            ErrorCode::NotFound => "NOT_FOUND_ERROR",
            ErrorCode::StoreNotFound => "STORE_NOT_FOUND_ERROR",
            ErrorCode::StoreItemNotFound => "STORE_ITEM_NOT_FOUND_ERROR",
            ErrorCode::InternalServer => "INTERNAL_SERVER_ERROR",
            ErrorCode::Permission => "PERMISSION_ERROR",
            ErrorCode::Authentication => "AUTHENTICATION_ERROR",
            ErrorCode::Cancelled => "CANCELLED_ERROR",
            ErrorCode::Connection => "CONNECTION_ERROR",
            ErrorCode::LimitExceeded => "LIMIT_EXCEEDED_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST_ERROR",
            ErrorCode::Timeout => "TIMEOUT_ERROR",
            ErrorCode::ServerUnavailable => "SERVER_UNAVAILABLE",
            ErrorCode::FailedPrecondition => "FAILED_PRECONDITION_ERROR",
            ErrorCode::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Human prefix placed in front of every error message with this code.
    fn prefix(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "Invalid argument passed to cache client",
            ErrorCode::UnknownService => "Service returned an unknown response",
            ErrorCode::AlreadyExists => "A resource with the specified name already exists",
            ErrorCode::NotFound => {
                "A cache with the specified name does not exist. Create the cache before using it"
            }
            ErrorCode::StoreNotFound => "A store with the specified name does not exist",
            ErrorCode::StoreItemNotFound => "The specified item does not exist in the store",
            ErrorCode::InternalServer => {
                "An unexpected error occurred while trying to fulfill the request"
            }
            ErrorCode::Permission => "Insufficient permissions to perform the operation",
            ErrorCode::Authentication => "Invalid authentication credentials",
            ErrorCode::Cancelled => "The request was cancelled by the server",
            ErrorCode::Connection => "Unable to connect to the server",
            ErrorCode::LimitExceeded => "Request rate, bandwidth, or object size exceeded the limits",
            ErrorCode::BadRequest => "The request was invalid",
            ErrorCode::Timeout => "The configured request timeout was exceeded",
            ErrorCode::ServerUnavailable => "The server was unable to handle the request",
            ErrorCode::FailedPrecondition => {
                "System is not in a state required for the operation's execution"
            }
            ErrorCode::Unknown => "Unknown error has occurred",
        }
    }

    /// Returns true if the failure class is transient. Callers decide whether
    /// to retry; nothing in this crate does.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::Timeout
                | ErrorCode::ServerUnavailable
                | ErrorCode::InternalServer
                | ErrorCode::Connection
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error attached to the `Error` variant of every outcome.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}: {}", .code.prefix(), .message)]
pub struct SdkError {
    code: ErrorCode,
    message: String,
    transport: Option<TransportFailure>,
}

impl SdkError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            transport: None,
        }
    }

    /// Local validation failure, raised before any remote call.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// The transport answered with a payload this operation cannot decode.
    pub fn unexpected_payload(operation: &str, kind: PayloadKind) -> Self {
        Self::new(
            ErrorCode::Unknown,
            format!("unexpected {kind:?} payload for {operation}"),
        )
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Detail message without the code prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The original transport failure, for diagnostics only.
    pub fn transport_failure(&self) -> Option<&TransportFailure> {
        self.transport.as_ref()
    }
}

/// Classify a transport status into a canonical code.
pub fn classify(status: TransportStatus, metadata: Option<&str>) -> ErrorCode {
    match status {
        TransportStatus::InvalidArgument | TransportStatus::OutOfRange => {
            ErrorCode::InvalidArgument
        }
        TransportStatus::Unimplemented => ErrorCode::BadRequest,
        TransportStatus::FailedPrecondition => ErrorCode::FailedPrecondition,
        TransportStatus::Cancelled => ErrorCode::Cancelled,
        TransportStatus::DeadlineExceeded => ErrorCode::Timeout,
        TransportStatus::PermissionDenied => ErrorCode::Permission,
        TransportStatus::Unauthenticated => ErrorCode::Authentication,
        TransportStatus::ResourceExhausted => ErrorCode::LimitExceeded,
        TransportStatus::NotFound => match metadata {
            Some(not_found::STORE) => ErrorCode::StoreNotFound,
            Some(not_found::ITEM) => ErrorCode::StoreItemNotFound,
            _ => ErrorCode::NotFound,
        },
        TransportStatus::AlreadyExists => ErrorCode::AlreadyExists,
        TransportStatus::Unknown => ErrorCode::UnknownService,
        TransportStatus::Aborted | TransportStatus::Internal | TransportStatus::DataLoss => {
            ErrorCode::InternalServer
        }
        TransportStatus::Unavailable => ErrorCode::ServerUnavailable,
        TransportStatus::Ok => ErrorCode::Unknown,
    }
}

impl From<TransportFailure> for SdkError {
    fn from(failure: TransportFailure) -> Self {
        let code = classify(failure.status, failure.metadata.as_deref());
        Self {
            code,
            message: failure.message.clone(),
            transport: Some(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = SdkError::invalid_argument("minScore must be less than or equal to maxScore");
        assert_eq!(
            err.to_string(),
            "Invalid argument passed to cache client: minScore must be less than or equal to maxScore"
        );
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(err.transport_failure().is_none());
    }

    #[test]
    fn test_code_strings() {
        assert_eq!(ErrorCode::InvalidArgument.as_str(), "INVALID_ARGUMENT_ERROR");
        assert_eq!(ErrorCode::FailedPrecondition.to_string(), "FAILED_PRECONDITION_ERROR");
        assert_eq!(ErrorCode::StoreNotFound.as_str(), "STORE_NOT_FOUND_ERROR");
    }

    #[test]
    fn test_mapping_is_total() {
        for code in 0..=16u8 {
            let status = TransportStatus::from_code(code).unwrap();
            // every status maps to some code without panicking
            let _ = classify(status, None);
        }
        assert_eq!(classify(TransportStatus::Ok, None), ErrorCode::Unknown);
    }

    #[test]
    fn test_mapping_classes() {
        assert_eq!(classify(TransportStatus::OutOfRange, None), ErrorCode::InvalidArgument);
        assert_eq!(classify(TransportStatus::Unimplemented, None), ErrorCode::BadRequest);
        assert_eq!(classify(TransportStatus::DeadlineExceeded, None), ErrorCode::Timeout);
        assert_eq!(classify(TransportStatus::DataLoss, None), ErrorCode::InternalServer);
        assert_eq!(classify(TransportStatus::Unknown, None), ErrorCode::UnknownService);
        assert_eq!(
            classify(TransportStatus::ResourceExhausted, None),
            ErrorCode::LimitExceeded
        );
    }

    #[test]
    fn test_not_found_metadata() {
        assert_eq!(classify(TransportStatus::NotFound, None), ErrorCode::NotFound);
        assert_eq!(
            classify(TransportStatus::NotFound, Some(not_found::STORE)),
            ErrorCode::StoreNotFound
        );
        assert_eq!(
            classify(TransportStatus::NotFound, Some(not_found::ITEM)),
            ErrorCode::StoreItemNotFound
        );
    }

    #[test]
    fn test_from_transport_failure_keeps_original() {
        let failure = TransportFailure::new(TransportStatus::FailedPrecondition, "value is not a number");
        let err: SdkError = failure.clone().into();
        assert_eq!(err.code(), ErrorCode::FailedPrecondition);
        assert_eq!(err.message(), "value is not a number");
        assert_eq!(err.transport_failure(), Some(&failure));
    }

    #[test]
    fn test_timeout_is_retryable() {
        let err: SdkError = TransportFailure::timeout("deadline exceeded").into();
        assert_eq!(err.code(), ErrorCode::Timeout);
        assert!(err.code().is_retryable());
        assert!(!ErrorCode::InvalidArgument.is_retryable());
    }
}
