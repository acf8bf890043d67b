use super::length_or_miss;
use crate::error::EngineError;
use crate::item::Item;
use crate::keyspace::Keyspace;
use ouroboros_cache::{Payload, TtlPolicy};
use std::collections::HashSet;

pub fn add(
    keyspace: &Keyspace,
    set: &[u8],
    elements: Vec<Vec<u8>>,
    ttl: TtlPolicy,
) -> Result<Payload, EngineError> {
    keyspace.upsert_collection(set, ttl, || Item::Set(HashSet::new()), |item| {
        item.set_mut()?.extend(elements);
        Ok(Payload::Unit)
    })
}

pub fn remove(keyspace: &Keyspace, set: &[u8], elements: &[Vec<u8>]) -> Result<Payload, EngineError> {
    keyspace.modify_existing(set, None, |item| {
        let members = item.set_mut()?;
        elements.iter().for_each(|element| {
            members.remove(element);
        });
        Ok(())
    })?;
    Ok(Payload::Unit)
}

pub fn fetch(keyspace: &Keyspace, set: &[u8]) -> Result<Payload, EngineError> {
    let members = keyspace.read(set, |item| Ok(item.set()?.iter().cloned().collect()))?;
    Ok(members.map_or(Payload::Miss, Payload::Values))
}

pub fn contains(keyspace: &Keyspace, set: &[u8], elements: &[Vec<u8>]) -> Result<Payload, EngineError> {
    let flags = keyspace.read(set, |item| {
        let members = item.set()?;
        Ok(elements.iter().map(|element| members.contains(element)).collect())
    })?;
    Ok(flags.map_or(Payload::Miss, Payload::Flags))
}

pub fn length(keyspace: &Keyspace, set: &[u8]) -> Result<Payload, EngineError> {
    let len = keyspace.read(set, |item| Ok(item.set()?.len()))?;
    Ok(length_or_miss(len))
}

/// Up to `limit` distinct members, in hash order.
pub fn sample(keyspace: &Keyspace, set: &[u8], limit: u32) -> Result<Payload, EngineError> {
    let members = keyspace.read(set, |item| {
        Ok(item.set()?.iter().take(limit as usize).cloned().collect())
    })?;
    Ok(members.map_or(Payload::Miss, Payload::Values))
}

/// Remove and return up to `count` members.
pub fn pop(keyspace: &Keyspace, set: &[u8], count: u32) -> Result<Payload, EngineError> {
    let popped = keyspace.modify_existing(set, None, |item| {
        let members = item.set_mut()?;
        let chosen: Vec<Vec<u8>> = members.iter().take(count as usize).cloned().collect();
        chosen.iter().for_each(|element| {
            members.remove(element);
        });
        Ok(chosen)
    })?;
    Ok(popped.map_or(Payload::Miss, Payload::Values))
}
