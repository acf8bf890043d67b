use crate::error::EngineError;
use crate::item::{add_to_integer, Entry, Item};
use crate::keyspace::Keyspace;
use ouroboros_cache::{Payload, SetCondition};
use std::time::Duration;

pub fn get(keyspace: &Keyspace, key: &[u8]) -> Result<Payload, EngineError> {
    Ok(keyspace
        .read(key, |item| item.scalar().cloned())?
        .map_or(Payload::Miss, Payload::Value))
}

/// Replaces whatever the key held, of any type.
pub fn set(
    keyspace: &Keyspace,
    key: Vec<u8>,
    value: Vec<u8>,
    ttl: Duration,
) -> Result<Payload, EngineError> {
    keyspace.mutate(&key, |slot| *slot = Some(Entry::new(Item::Scalar(value), ttl)));
    Ok(Payload::Unit)
}

pub fn set_if(
    keyspace: &Keyspace,
    key: Vec<u8>,
    value: Vec<u8>,
    condition: &SetCondition,
    ttl: Duration,
) -> Result<Payload, EngineError> {
    keyspace.mutate(&key, |slot| {
        let current = slot
            .as_ref()
            .map(|entry| entry.item.scalar().map(Vec::as_slice))
            .transpose()?;
        if !condition.holds(current) {
            return Ok(Payload::Flag(false));
        }
        *slot = Some(Entry::new(Item::Scalar(value), ttl));
        Ok(Payload::Flag(true))
    })
}

pub fn delete(keyspace: &Keyspace, key: &[u8]) -> Result<Payload, EngineError> {
    keyspace.mutate(key, |slot| *slot = None);
    Ok(Payload::Unit)
}

/// The stored value is kept as its decimal text.
pub fn increment(
    keyspace: &Keyspace,
    key: &[u8],
    amount: i64,
    ttl: Duration,
) -> Result<Payload, EngineError> {
    keyspace.mutate(key, |slot| {
        let current = slot
            .as_ref()
            .map(|entry| entry.item.scalar().map(Vec::as_slice))
            .transpose()?;
        let next = add_to_integer(current, amount)?;
        *slot = Some(Entry::new(Item::Scalar(next.to_string().into_bytes()), ttl));
        Ok(Payload::Integer(next))
    })
}

pub fn keys_exist(keyspace: &Keyspace, keys: &[Vec<u8>]) -> Result<Payload, EngineError> {
    Ok(Payload::Flags(
        keys.iter()
            .map(|key| keyspace.view(key, |_| ()).is_some())
            .collect(),
    ))
}

pub fn item_type(keyspace: &Keyspace, key: &[u8]) -> Result<Payload, EngineError> {
    Ok(keyspace
        .view(key, |entry| entry.item.item_type())
        .map_or(Payload::Miss, Payload::ItemType))
}

pub fn item_ttl(keyspace: &Keyspace, key: &[u8]) -> Result<Payload, EngineError> {
    Ok(keyspace
        .view(key, Entry::remaining)
        .map_or(Payload::Miss, Payload::Ttl))
}

pub fn update_ttl(keyspace: &Keyspace, key: &[u8], ttl: Duration) -> Result<Payload, EngineError> {
    Ok(keyspace.mutate(key, |slot| match slot {
        Some(entry) => {
            entry.expire_in(ttl);
            Payload::Unit
        }
        None => Payload::Miss,
    }))
}

/// Apply `ttl` only when `accept(ttl, remaining)` holds.
pub fn adjust_ttl(
    keyspace: &Keyspace,
    key: &[u8],
    ttl: Duration,
    accept: fn(Duration, Duration) -> bool,
) -> Result<Payload, EngineError> {
    Ok(keyspace.mutate(key, |slot| match slot {
        Some(entry) if accept(ttl, entry.remaining()) => {
            entry.expire_in(ttl);
            Payload::Flag(true)
        }
        Some(_) => Payload::Flag(false),
        None => Payload::Miss,
    }))
}
