//! Cache lifecycle operations

use super::CacheClient;
use crate::error::ErrorCode;
use crate::request::{ControlCommand, Payload, Request};
use crate::responses::{CacheFlush, CreateCache, DeleteCache, ListCaches};
use crate::validation::validate_cache_name;

impl CacheClient {
    /// Create a cache. An existing cache yields `AlreadyExists`, not an error.
    pub async fn create_cache(&self, cache_name: &str) -> CreateCache {
        self.dispatcher
            .call_with(
                "create_cache",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    Ok(Request::Control(ControlCommand::CreateCache {
                        name: cache_name.to_string(),
                    }))
                },
                |payload| matches!(payload, Payload::Unit).then_some(CreateCache::Success),
                |err| match err.code() {
                    ErrorCode::AlreadyExists => CreateCache::AlreadyExists,
                    _ => CreateCache::Error(err),
                },
            )
            .await
    }

    pub async fn delete_cache(&self, cache_name: &str) -> DeleteCache {
        self.dispatcher
            .call(
                "delete_cache",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    Ok(Request::Control(ControlCommand::DeleteCache {
                        name: cache_name.to_string(),
                    }))
                },
                |payload| matches!(payload, Payload::Unit).then_some(DeleteCache::Success),
            )
            .await
    }

    pub async fn list_caches(&self) -> ListCaches {
        self.dispatcher
            .call(
                "list_caches",
                "",
                || Ok(Request::Control(ControlCommand::ListCaches)),
                |payload| match payload {
                    Payload::Caches(caches) => Some(ListCaches::Success(caches)),
                    _ => None,
                },
            )
            .await
    }

    /// Remove every item from a cache, keeping the cache itself.
    pub async fn flush_cache(&self, cache_name: &str) -> CacheFlush {
        self.dispatcher
            .call(
                "flush_cache",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    Ok(Request::Control(ControlCommand::FlushCache {
                        name: cache_name.to_string(),
                    }))
                },
                |payload| matches!(payload, Payload::Unit).then_some(CacheFlush::Success),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::responses::*;
    use crate::transport::{TransportFailure, TransportStatus};

    #[tokio::test]
    async fn test_create_existing_cache() {
        let transport = ScriptedTransport::answering(vec![
            Ok(crate::request::Payload::Unit),
            Err(TransportFailure::new(TransportStatus::AlreadyExists, "exists")),
            Err(TransportFailure::new(TransportStatus::PermissionDenied, "no")),
        ]);
        let client = client(transport);
        assert_eq!(client.create_cache("c").await, CreateCache::Success);
        assert_eq!(client.create_cache("c").await, CreateCache::AlreadyExists);
        assert!(client.create_cache("c").await.is_error());
    }
}
