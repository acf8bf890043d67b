//! In-process cache service
//!
//! Executes operation descriptors the way the remote service does: every
//! cache owns a sharded keyspace, its leaderboards and its webhooks; stores
//! and vector indexes live beside the caches.

use crate::commands;
use crate::error::EngineError;
use crate::keyspace::{Keyspace, DEFAULT_NUM_SHARDS};
use crate::leaderboard::Leaderboards;
use crate::store::Stores;
use crate::vector::VectorIndexes;
use crate::webhook::Webhooks;
use ouroboros_cache::{CacheInfo, ControlCommand, Payload, RawOutcome, Request};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything held by one cache.
pub struct CacheState {
    pub keyspace: Keyspace,
    pub leaderboards: Leaderboards,
    pub webhooks: Webhooks,
}

impl CacheState {
    fn new(num_shards: usize) -> Self {
        Self {
            keyspace: Keyspace::with_shards(num_shards),
            leaderboards: Leaderboards::default(),
            webhooks: Webhooks::default(),
        }
    }

    fn flush(&self) {
        self.keyspace.flush();
        self.leaderboards.clear();
    }
}

/// Sharded, TTL-aware cache service held in memory
pub struct CacheEngine {
    caches: RwLock<BTreeMap<String, Arc<CacheState>>>,
    stores: Stores,
    indexes: VectorIndexes,
    num_shards: usize,
}

impl CacheEngine {
    /// Create an engine with the default number of shards per cache
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_NUM_SHARDS)
    }

    /// Create an engine with `num_shards` shards per cache
    pub fn with_shards(num_shards: usize) -> Self {
        Self {
            caches: RwLock::new(BTreeMap::new()),
            stores: Stores::default(),
            indexes: VectorIndexes::default(),
            num_shards,
        }
    }

    /// Execute one descriptor, answering as the service would.
    pub fn execute(&self, request: Request) -> RawOutcome {
        self.dispatch(request).map_err(|err| {
            debug!(status = ?err.status(), "engine rejected request: {}", err);
            err.into()
        })
    }

    fn dispatch(&self, request: Request) -> Result<Payload, EngineError> {
        match request {
            Request::Control(command) => self.control(command),
            Request::Cache {
                cache_name,
                command,
            } => commands::apply(&self.cache(&cache_name)?.keyspace, command),
            Request::Leaderboard {
                cache_name,
                leaderboard,
                command,
            } => Ok(self
                .cache(&cache_name)?
                .leaderboards
                .apply(&leaderboard, command)),
            Request::Store {
                store_name,
                command,
            } => self.stores.apply(&store_name, command),
            Request::VectorIndex {
                index_name,
                command,
            } => self.indexes.apply(&index_name, command),
            Request::Webhook {
                cache_name,
                command,
            } => self.cache(&cache_name)?.webhooks.apply(&cache_name, command),
        }
    }

    fn cache(&self, name: &str) -> Result<Arc<CacheState>, EngineError> {
        self.caches
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::CacheNotFound(name.to_string()))
    }

    fn control(&self, command: ControlCommand) -> Result<Payload, EngineError> {
        match command {
            ControlCommand::CreateCache { name } => {
                let mut caches = self.caches.write();
                if caches.contains_key(&name) {
                    return Err(EngineError::AlreadyExists {
                        kind: "Cache",
                        name,
                    });
                }
                info!(cache = %name, "cache created");
                caches.insert(name, Arc::new(CacheState::new(self.num_shards)));
                Ok(Payload::Unit)
            }
            ControlCommand::DeleteCache { name } => {
                self.caches
                    .write()
                    .remove(&name)
                    .ok_or_else(|| EngineError::CacheNotFound(name.clone()))?;
                info!(cache = %name, "cache deleted");
                Ok(Payload::Unit)
            }
            ControlCommand::ListCaches => Ok(Payload::Caches(
                self.caches
                    .read()
                    .keys()
                    .map(|name| CacheInfo { name: name.clone() })
                    .collect(),
            )),
            ControlCommand::FlushCache { name } => {
                self.cache(&name)?.flush();
                info!(cache = %name, "cache flushed");
                Ok(Payload::Unit)
            }
            ControlCommand::CreateStore { name } => {
                self.stores.create(&name)?;
                info!(store = %name, "store created");
                Ok(Payload::Unit)
            }
            ControlCommand::DeleteStore { name } => {
                self.stores.delete(&name)?;
                info!(store = %name, "store deleted");
                Ok(Payload::Unit)
            }
            ControlCommand::ListStores => Ok(Payload::Stores(self.stores.list())),
            ControlCommand::CreateIndex {
                name,
                num_dimensions,
                metric,
            } => {
                if num_dimensions == 0 {
                    return Err(EngineError::InvalidArgument(
                        "num_dimensions must be greater than zero".to_string(),
                    ));
                }
                self.indexes.create(&name, num_dimensions, metric)?;
                info!(index = %name, num_dimensions, ?metric, "vector index created");
                Ok(Payload::Unit)
            }
            ControlCommand::DeleteIndex { name } => {
                self.indexes.delete(&name)?;
                info!(index = %name, "vector index deleted");
                Ok(Payload::Unit)
            }
            ControlCommand::ListIndexes => Ok(Payload::Indexes(self.indexes.list())),
        }
    }

    /// Drop expired items across all caches, returns count removed
    pub fn cleanup_expired(&self) -> usize {
        self.caches
            .read()
            .values()
            .map(|cache| cache.keyspace.cleanup_expired())
            .sum()
    }

    pub fn num_shards(&self) -> usize {
        self.num_shards
    }
}

impl Default for CacheEngine {
    fn default() -> Self {
        Self::new()
    }
}
