use super::length_or_miss;
use crate::error::EngineError;
use crate::item::Item;
use crate::keyspace::Keyspace;
use crate::ranking::Ranking;
use ouroboros_cache::{
    resolve_range, Payload, ScoredElement, SortOrder, TtlPolicy, MAX_RANGE_WINDOW,
};

fn empty() -> Item {
    Item::SortedSet(Ranking::default())
}

fn scored(members: impl IntoIterator<Item = (Vec<u8>, f64)>) -> Vec<ScoredElement> {
    members
        .into_iter()
        .map(|(value, score)| ScoredElement::new(value, score))
        .collect()
}

pub fn put(
    keyspace: &Keyspace,
    sorted_set: &[u8],
    elements: Vec<(Vec<u8>, f64)>,
    ttl: TtlPolicy,
) -> Result<Payload, EngineError> {
    keyspace.upsert_collection(sorted_set, ttl, empty, |item| {
        let ranking = item.sorted_set_mut()?;
        for (value, score) in elements {
            ranking.upsert(value, score);
        }
        Ok(Payload::Unit)
    })
}

pub fn fetch_by_rank(
    keyspace: &Keyspace,
    sorted_set: &[u8],
    start: Option<i32>,
    end: Option<i32>,
    order: SortOrder,
) -> Result<Payload, EngineError> {
    let bounded = start.is_some() && end.is_some();
    let elements = keyspace.read(sorted_set, |item| {
        let ordered = item.sorted_set()?.ordered(order);
        let (start, end) = resolve_range(ordered.len(), start, end);
        // Mixed-sign bounds are only comparable once resolved.
        if bounded && (end - start) as i64 > MAX_RANGE_WINDOW {
            return Err(EngineError::InvalidArgument(format!(
                "end rank - start rank must be less than or equal to {MAX_RANGE_WINDOW}"
            )));
        }
        Ok(scored(ordered.into_iter().skip(start).take(end - start)))
    })?;
    Ok(elements.map_or(Payload::Miss, Payload::Scored))
}

/// Filter by the inclusive score window, order, then paginate.
pub fn fetch_by_score(
    keyspace: &Keyspace,
    sorted_set: &[u8],
    (min_score, max_score): (Option<f64>, Option<f64>),
    order: SortOrder,
    offset: Option<u32>,
    count: Option<u32>,
) -> Result<Payload, EngineError> {
    let elements = keyspace.read(sorted_set, |item| {
        let matching = item
            .sorted_set()?
            .ordered_by_score(min_score, max_score, order)
            .into_iter()
            .skip(offset.unwrap_or(0) as usize);
        Ok(match count {
            Some(count) => scored(matching.take(count as usize)),
            None => scored(matching),
        })
    })?;
    Ok(elements.map_or(Payload::Miss, Payload::Scored))
}

pub fn rank(
    keyspace: &Keyspace,
    sorted_set: &[u8],
    value: &[u8],
    order: SortOrder,
) -> Result<Payload, EngineError> {
    let rank = keyspace.read(sorted_set, |item| {
        Ok(item.sorted_set()?.rank(&value.to_vec(), order))
    })?;
    Ok(rank.flatten().map_or(Payload::Miss, Payload::Rank))
}

/// Scores of the values present; absent values are left out.
pub fn scores(keyspace: &Keyspace, sorted_set: &[u8], values: &[Vec<u8>]) -> Result<Payload, EngineError> {
    let elements = keyspace.read(sorted_set, |item| {
        let ranking = item.sorted_set()?;
        Ok(scored(values.iter().filter_map(|value| {
            ranking.score(value).map(|score| (value.clone(), score))
        })))
    })?;
    Ok(elements.map_or(Payload::Miss, Payload::Scored))
}

pub fn increment(
    keyspace: &Keyspace,
    sorted_set: &[u8],
    value: Vec<u8>,
    amount: f64,
    ttl: TtlPolicy,
) -> Result<Payload, EngineError> {
    keyspace.upsert_collection(sorted_set, ttl, empty, |item| {
        Ok(Payload::Float(item.sorted_set_mut()?.increment(value, amount)))
    })
}

pub fn remove(keyspace: &Keyspace, sorted_set: &[u8], values: &[Vec<u8>]) -> Result<Payload, EngineError> {
    keyspace.modify_existing(sorted_set, None, |item| {
        let ranking = item.sorted_set_mut()?;
        values.iter().for_each(|value| {
            ranking.remove(value);
        });
        Ok(())
    })?;
    Ok(Payload::Unit)
}

pub fn length(keyspace: &Keyspace, sorted_set: &[u8]) -> Result<Payload, EngineError> {
    let len = keyspace.read(sorted_set, |item| Ok(item.sorted_set()?.len()))?;
    Ok(length_or_miss(len))
}

pub fn length_by_score(
    keyspace: &Keyspace,
    sorted_set: &[u8],
    min_score: Option<f64>,
    max_score: Option<f64>,
) -> Result<Payload, EngineError> {
    let len = keyspace.read(sorted_set, |item| {
        Ok(item.sorted_set()?.count_by_score(min_score, max_score))
    })?;
    Ok(length_or_miss(len))
}
