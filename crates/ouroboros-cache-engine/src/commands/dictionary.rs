use super::length_or_miss;
use crate::error::EngineError;
use crate::item::{add_to_integer, Item};
use crate::keyspace::Keyspace;
use ouroboros_cache::{Payload, TtlPolicy};
use std::collections::HashMap;

fn empty() -> Item {
    Item::Dictionary(HashMap::new())
}

pub fn fetch(keyspace: &Keyspace, dictionary: &[u8]) -> Result<Payload, EngineError> {
    let pairs = keyspace.read(dictionary, |item| {
        Ok(item
            .dictionary()?
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect())
    })?;
    Ok(pairs.map_or(Payload::Miss, Payload::Pairs))
}

pub fn get_fields(
    keyspace: &Keyspace,
    dictionary: &[u8],
    fields: &[Vec<u8>],
) -> Result<Payload, EngineError> {
    let values = keyspace.read(dictionary, |item| {
        let map = item.dictionary()?;
        Ok(fields.iter().map(|field| map.get(field).cloned()).collect())
    })?;
    Ok(values.map_or(Payload::Miss, Payload::OptionalValues))
}

pub fn set_fields(
    keyspace: &Keyspace,
    dictionary: &[u8],
    fields: Vec<(Vec<u8>, Vec<u8>)>,
    ttl: TtlPolicy,
) -> Result<Payload, EngineError> {
    keyspace.upsert_collection(dictionary, ttl, empty, |item| {
        item.dictionary_mut()?.extend(fields);
        Ok(Payload::Unit)
    })
}

pub fn remove_fields(
    keyspace: &Keyspace,
    dictionary: &[u8],
    fields: &[Vec<u8>],
) -> Result<Payload, EngineError> {
    keyspace.modify_existing(dictionary, None, |item| {
        let map = item.dictionary_mut()?;
        fields.iter().for_each(|field| {
            map.remove(field);
        });
        Ok(())
    })?;
    Ok(Payload::Unit)
}

pub fn increment(
    keyspace: &Keyspace,
    dictionary: &[u8],
    field: Vec<u8>,
    amount: i64,
    ttl: TtlPolicy,
) -> Result<Payload, EngineError> {
    keyspace.upsert_collection(dictionary, ttl, empty, |item| {
        let map = item.dictionary_mut()?;
        let next = add_to_integer(map.get(&field).map(Vec::as_slice), amount)?;
        map.insert(field, next.to_string().into_bytes());
        Ok(Payload::Integer(next))
    })
}

pub fn length(keyspace: &Keyspace, dictionary: &[u8]) -> Result<Payload, EngineError> {
    let len = keyspace.read(dictionary, |item| Ok(item.dictionary()?.len()))?;
    Ok(length_or_miss(len))
}
