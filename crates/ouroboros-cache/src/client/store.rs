//! Typed key-value stores

use super::Dispatcher;
use crate::error::{ErrorCode, SdkError};
use crate::request::{ControlCommand, Payload, Request, StoreCommand};
use crate::responses::{CreateStore, DeleteStore, ListStores, StoreDelete, StoreGet, StorePut};
use crate::types::StoreValue;
use crate::validation::validate_store_name;

/// Client for store resources. Obtained from
/// [`CacheClient::store_client`](super::CacheClient::store_client).
#[derive(Clone)]
pub struct StoreClient {
    dispatcher: Dispatcher,
}

fn validate_store_key(key: &str) -> Result<(), SdkError> {
    if key.trim().is_empty() {
        return Err(SdkError::invalid_argument("key must not be empty"));
    }
    Ok(())
}

impl StoreClient {
    pub(crate) fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn create_store(&self, store_name: &str) -> CreateStore {
        self.dispatcher
            .call_with(
                "create_store",
                store_name,
                || {
                    validate_store_name(store_name)?;
                    Ok(Request::Control(ControlCommand::CreateStore {
                        name: store_name.to_string(),
                    }))
                },
                |payload| matches!(payload, Payload::Unit).then_some(CreateStore::Success),
                |err| match err.code() {
                    ErrorCode::AlreadyExists => CreateStore::AlreadyExists,
                    _ => CreateStore::Error(err),
                },
            )
            .await
    }

    pub async fn delete_store(&self, store_name: &str) -> DeleteStore {
        self.dispatcher
            .call(
                "delete_store",
                store_name,
                || {
                    validate_store_name(store_name)?;
                    Ok(Request::Control(ControlCommand::DeleteStore {
                        name: store_name.to_string(),
                    }))
                },
                |payload| matches!(payload, Payload::Unit).then_some(DeleteStore::Success),
            )
            .await
    }

    pub async fn list_stores(&self) -> ListStores {
        self.dispatcher
            .call(
                "list_stores",
                "",
                || Ok(Request::Control(ControlCommand::ListStores)),
                |payload| match payload {
                    Payload::Stores(stores) => Some(ListStores::Success(stores)),
                    _ => None,
                },
            )
            .await
    }

    pub async fn put(&self, store_name: &str, key: &str, value: StoreValue) -> StorePut {
        self.dispatcher
            .call(
                "store_put",
                store_name,
                || {
                    validate_store_name(store_name)?;
                    validate_store_key(key)?;
                    Ok(Request::Store {
                        store_name: store_name.to_string(),
                        command: StoreCommand::Put {
                            key: key.to_string(),
                            value,
                        },
                    })
                },
                |payload| matches!(payload, Payload::Unit).then_some(StorePut::Success),
            )
            .await
    }

    pub async fn put_int(&self, store_name: &str, key: &str, value: i64) -> StorePut {
        self.put(store_name, key, StoreValue::Int(value)).await
    }

    pub async fn put_double(&self, store_name: &str, key: &str, value: f64) -> StorePut {
        self.put(store_name, key, StoreValue::Double(value)).await
    }

    pub async fn put_string(&self, store_name: &str, key: &str, value: impl Into<String>) -> StorePut {
        self.put(store_name, key, StoreValue::String(value.into()))
            .await
    }

    pub async fn put_bytes(&self, store_name: &str, key: &str, value: impl Into<Vec<u8>>) -> StorePut {
        self.put(store_name, key, StoreValue::Bytes(value.into()))
            .await
    }

    /// `NotFound` when the key is absent; a missing store is an error.
    pub async fn get(&self, store_name: &str, key: &str) -> StoreGet {
        self.dispatcher
            .call_with(
                "store_get",
                store_name,
                || {
                    validate_store_name(store_name)?;
                    validate_store_key(key)?;
                    Ok(Request::Store {
                        store_name: store_name.to_string(),
                        command: StoreCommand::Get {
                            key: key.to_string(),
                        },
                    })
                },
                |payload| match payload {
                    Payload::StoreValue(value) => Some(StoreGet::Found(value)),
                    Payload::Miss => Some(StoreGet::NotFound),
                    _ => None,
                },
                |err| match err.code() {
                    ErrorCode::StoreItemNotFound => StoreGet::NotFound,
                    _ => StoreGet::Error(err),
                },
            )
            .await
    }

    pub async fn delete(&self, store_name: &str, key: &str) -> StoreDelete {
        self.dispatcher
            .call(
                "store_delete",
                store_name,
                || {
                    validate_store_name(store_name)?;
                    validate_store_key(key)?;
                    Ok(Request::Store {
                        store_name: store_name.to_string(),
                        command: StoreCommand::Delete {
                            key: key.to_string(),
                        },
                    })
                },
                |payload| matches!(payload, Payload::Unit).then_some(StoreDelete::Success),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::responses::Outcome;
    use crate::transport::{not_found, TransportFailure, TransportStatus};

    #[tokio::test]
    async fn test_get_maps_missing_item_to_not_found() {
        let transport = ScriptedTransport::answering(vec![
            Err(TransportFailure::new(TransportStatus::NotFound, "no item")
                .with_metadata(not_found::ITEM)),
            Err(TransportFailure::new(TransportStatus::NotFound, "no store")
                .with_metadata(not_found::STORE)),
            Ok(Payload::StoreValue(StoreValue::Int(7))),
        ]);
        let stores = client(transport).store_client();

        assert_eq!(stores.get("store", "k").await, StoreGet::NotFound);
        assert_eq!(
            stores.get("store", "k").await.error().map(|e| e.code()),
            Some(ErrorCode::StoreNotFound)
        );
        assert_eq!(
            stores.get("store", "k").await.value().and_then(StoreValue::as_int),
            Some(7)
        );
    }

    #[tokio::test]
    async fn test_blank_store_key() {
        let transport = ScriptedTransport::answering(vec![]);
        let stores = client(transport.clone()).store_client();
        assert!(stores.put_int("store", " ", 1).await.is_error());
        assert!(stores.get("", "k").await.is_error());
        assert_eq!(transport.request_count(), 0);
    }
}
