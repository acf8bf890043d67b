//! Typed key-value stores

use crate::error::EngineError;
use ouroboros_cache::{Payload, StoreCommand, StoreInfo, StoreValue};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Stores by name. Store items never expire.
#[derive(Default)]
pub struct Stores {
    stores: RwLock<BTreeMap<String, HashMap<String, StoreValue>>>,
}

impl Stores {
    pub fn create(&self, name: &str) -> Result<(), EngineError> {
        let mut stores = self.stores.write();
        if stores.contains_key(name) {
            return Err(EngineError::AlreadyExists {
                kind: "Store",
                name: name.to_string(),
            });
        }
        stores.insert(name.to_string(), HashMap::new());
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<(), EngineError> {
        self.stores
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| EngineError::StoreNotFound(name.to_string()))
    }

    /// Stores ordered by name.
    pub fn list(&self) -> Vec<StoreInfo> {
        self.stores
            .read()
            .keys()
            .map(|name| StoreInfo { name: name.clone() })
            .collect()
    }

    pub fn apply(&self, name: &str, command: StoreCommand) -> Result<Payload, EngineError> {
        let missing = || EngineError::StoreNotFound(name.to_string());
        match command {
            StoreCommand::Get { key } => {
                let stores = self.stores.read();
                let store = stores.get(name).ok_or_else(missing)?;
                store
                    .get(&key)
                    .cloned()
                    .map(Payload::StoreValue)
                    .ok_or(EngineError::StoreItemNotFound(key))
            }
            StoreCommand::Put { key, value } => {
                let mut stores = self.stores.write();
                stores.get_mut(name).ok_or_else(missing)?.insert(key, value);
                Ok(Payload::Unit)
            }
            StoreCommand::Delete { key } => {
                let mut stores = self.stores.write();
                stores.get_mut(name).ok_or_else(missing)?.remove(&key);
                Ok(Payload::Unit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_lifecycle() {
        let stores = Stores::default();
        stores.create("s").unwrap();
        assert!(matches!(
            stores.create("s"),
            Err(EngineError::AlreadyExists { kind: "Store", .. })
        ));

        stores
            .apply(
                "s",
                StoreCommand::Put {
                    key: "k".into(),
                    value: StoreValue::Double(1.5),
                },
            )
            .unwrap();
        assert_eq!(
            stores.apply("s", StoreCommand::Get { key: "k".into() }),
            Ok(Payload::StoreValue(StoreValue::Double(1.5)))
        );
        assert_eq!(
            stores.apply("s", StoreCommand::Get { key: "x".into() }),
            Err(EngineError::StoreItemNotFound("x".into()))
        );

        stores.delete("s").unwrap();
        assert_eq!(
            stores.apply("s", StoreCommand::Delete { key: "k".into() }),
            Err(EngineError::StoreNotFound("s".into()))
        );
    }
}
