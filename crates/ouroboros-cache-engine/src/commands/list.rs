use super::length_or_miss;
use crate::error::EngineError;
use crate::item::Item;
use crate::keyspace::Keyspace;
use ouroboros_cache::{resolve_range, ListEnd, Payload, TtlPolicy};
use std::collections::VecDeque;

pub fn fetch(
    keyspace: &Keyspace,
    list: &[u8],
    start: Option<i32>,
    end: Option<i32>,
) -> Result<Payload, EngineError> {
    let values = keyspace.read(list, |item| {
        let values = item.list()?;
        let (start, end) = resolve_range(values.len(), start, end);
        Ok(values.range(start..end).cloned().collect())
    })?;
    Ok(values.map_or(Payload::Miss, Payload::Values))
}

pub fn length(keyspace: &Keyspace, list: &[u8]) -> Result<Payload, EngineError> {
    let len = keyspace.read(list, |item| Ok(item.list()?.len()))?;
    Ok(length_or_miss(len))
}

/// Push `values` at `end` keeping their order, then trim the opposite end
/// down to `truncate_to_size`.
pub fn concatenate(
    keyspace: &Keyspace,
    list: &[u8],
    values: Vec<Vec<u8>>,
    end: ListEnd,
    truncate_to_size: Option<u32>,
    ttl: TtlPolicy,
) -> Result<Payload, EngineError> {
    keyspace.upsert_collection(list, ttl, || Item::List(VecDeque::new()), |item| {
        let list = item.list_mut()?;
        match end {
            ListEnd::Back => list.extend(values),
            ListEnd::Front => values.into_iter().rev().for_each(|v| list.push_front(v)),
        }
        if let Some(size) = truncate_to_size {
            let size = size as usize;
            while list.len() > size {
                match end.opposite() {
                    ListEnd::Front => list.pop_front(),
                    ListEnd::Back => list.pop_back(),
                };
            }
        }
        Ok(Payload::Length(list.len() as u32))
    })
}

pub fn pop(keyspace: &Keyspace, list: &[u8], end: ListEnd) -> Result<Payload, EngineError> {
    let popped = keyspace.modify_existing(list, None, |item| {
        let list = item.list_mut()?;
        Ok(match end {
            ListEnd::Front => list.pop_front(),
            ListEnd::Back => list.pop_back(),
        })
    })?;
    Ok(popped.flatten().map_or(Payload::Miss, Payload::Value))
}

/// Removes every occurrence, keeping the order of the rest.
pub fn remove_value(keyspace: &Keyspace, list: &[u8], value: &[u8]) -> Result<Payload, EngineError> {
    keyspace.modify_existing(list, None, |item| {
        item.list_mut()?.retain(|v| v.as_slice() != value);
        Ok(())
    })?;
    Ok(Payload::Unit)
}

/// Keep only `[start, end)`. An absent list is left absent.
pub fn retain(
    keyspace: &Keyspace,
    list: &[u8],
    start: Option<i32>,
    end: Option<i32>,
    ttl: TtlPolicy,
) -> Result<Payload, EngineError> {
    keyspace.modify_existing(list, Some(ttl), |item| {
        let list = item.list_mut()?;
        let (start, end) = resolve_range(list.len(), start, end);
        list.truncate(end);
        list.drain(..start);
        Ok(())
    })?;
    Ok(Payload::Unit)
}
