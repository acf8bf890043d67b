//! Sharded keyspace of one cache
//!
//! Partitions keys across shards; each shard uses an RwLock for concurrent
//! reads and exclusive writes. Expired entries are dropped lazily on access
//! and in bulk by [`Keyspace::cleanup_expired`].

use crate::error::EngineError;
use crate::item::{Entry, Item};
use ouroboros_cache::TtlPolicy;
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Default number of shards per cache
pub const DEFAULT_NUM_SHARDS: usize = 16;

/// A single shard containing a portion of the keyspace
#[derive(Default)]
pub struct Shard {
    data: RwLock<HashMap<Vec<u8>, Entry>>,
}

impl Shard {
    /// Run `f` against the live entry for `key`, if any.
    pub fn view<R>(&self, key: &[u8], f: impl FnOnce(&Entry) -> R) -> Option<R> {
        let guard = self.data.read();
        guard.get(key).filter(|entry| !entry.is_expired()).map(f)
    }

    /// Run `f` with exclusive access to the slot for `key`. An expired entry
    /// is presented as absent; whatever `f` leaves in the slot is stored.
    pub fn mutate<R>(&self, key: &[u8], f: impl FnOnce(&mut Option<Entry>) -> R) -> R {
        let mut guard = self.data.write();
        let mut slot = guard.remove(key).filter(|entry| !entry.is_expired());
        let result = f(&mut slot);
        if let Some(entry) = slot {
            guard.insert(key.to_vec(), entry);
        }
        result
    }

    /// Entry count, including entries that expired but were not yet dropped
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Remove all expired entries, returns count removed
    pub fn cleanup_expired(&self) -> usize {
        let mut guard = self.data.write();
        let before = guard.len();
        guard.retain(|_, entry| !entry.is_expired());
        before - guard.len()
    }

    pub fn clear(&self) {
        self.data.write().clear();
    }
}

pub struct Keyspace {
    shards: Vec<Shard>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_NUM_SHARDS)
    }

    pub fn with_shards(num_shards: usize) -> Self {
        let shards = (0..num_shards.max(1)).map(|_| Shard::default()).collect();
        Self { shards }
    }

    #[inline]
    fn shard_for_key(&self, key: &[u8]) -> &Shard {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let idx = hasher.finish() as usize % self.shards.len();
        &self.shards[idx]
    }

    pub fn view<R>(&self, key: &[u8], f: impl FnOnce(&Entry) -> R) -> Option<R> {
        self.shard_for_key(key).view(key, f)
    }

    pub fn mutate<R>(&self, key: &[u8], f: impl FnOnce(&mut Option<Entry>) -> R) -> R {
        self.shard_for_key(key).mutate(key, f)
    }

    /// Read a live item. `Ok(None)` when the key is absent.
    pub fn read<R>(
        &self,
        key: &[u8],
        f: impl FnOnce(&Item) -> Result<R, EngineError>,
    ) -> Result<Option<R>, EngineError> {
        self.view(key, |entry| f(&entry.item)).transpose()
    }

    /// Mutate a collection, creating it with `create` when absent, then apply
    /// the TTL policy. A collection left empty is removed, and a failed
    /// mutation leaves the key as it was.
    pub fn upsert_collection<R>(
        &self,
        key: &[u8],
        ttl: TtlPolicy,
        create: impl FnOnce() -> Item,
        f: impl FnOnce(&mut Item) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        self.mutate(key, |slot| {
            let remaining = slot.as_ref().map(Entry::remaining);
            let entry = slot.get_or_insert_with(|| Entry::new(create(), ttl.ttl));
            let result = f(&mut entry.item);
            if result.is_ok() {
                entry.expire_in(ttl.apply(remaining));
            }
            if entry.item.is_empty() {
                *slot = None;
            }
            result
        })
    }

    /// Mutate an existing item; `Ok(None)` when the key is absent. When
    /// `ttl` is given it is applied after a successful mutation.
    pub fn modify_existing<R>(
        &self,
        key: &[u8],
        ttl: Option<TtlPolicy>,
        f: impl FnOnce(&mut Item) -> Result<R, EngineError>,
    ) -> Result<Option<R>, EngineError> {
        self.mutate(key, |slot| {
            let Some(entry) = slot.as_mut() else {
                return Ok(None);
            };
            let remaining = entry.remaining();
            let result = f(&mut entry.item)?;
            if let Some(ttl) = ttl {
                entry.expire_in(ttl.apply(Some(remaining)));
            }
            if entry.item.is_empty() {
                *slot = None;
            }
            Ok(Some(result))
        })
    }

    /// Get total entry count across all shards
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(Shard::is_empty)
    }

    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    pub fn cleanup_expired(&self) -> usize {
        self.shards.iter().map(Shard::cleanup_expired).sum()
    }

    pub fn flush(&self) {
        self.shards.iter().for_each(Shard::clear);
    }
}

impl Default for Keyspace {
    fn default() -> Self {
        Self::new()
    }
}
