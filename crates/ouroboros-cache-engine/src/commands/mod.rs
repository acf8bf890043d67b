//! Execution of item-level cache commands against a [`Keyspace`]

mod dictionary;
mod list;
mod scalar;
mod set;
mod sorted_set;

use crate::error::EngineError;
use crate::keyspace::Keyspace;
use ouroboros_cache::{CacheCommand, Payload};

/// Execute one command. Absent keys answer with `Payload::Miss` where the
/// operation distinguishes them.
pub fn apply(keyspace: &Keyspace, command: CacheCommand) -> Result<Payload, EngineError> {
    use CacheCommand::*;

    match command {
        Get { key } => scalar::get(keyspace, &key),
        Set { key, value, ttl } => scalar::set(keyspace, key, value, ttl),
        SetIf {
            key,
            value,
            condition,
            ttl,
        } => scalar::set_if(keyspace, key, value, &condition, ttl),
        Delete { key } => scalar::delete(keyspace, &key),
        Increment { key, amount, ttl } => scalar::increment(keyspace, &key, amount, ttl),
        KeysExist { keys } => scalar::keys_exist(keyspace, &keys),
        ItemGetType { key } => scalar::item_type(keyspace, &key),
        ItemGetTtl { key } => scalar::item_ttl(keyspace, &key),
        UpdateTtl { key, ttl } => scalar::update_ttl(keyspace, &key, ttl),
        IncreaseTtl { key, ttl } => scalar::adjust_ttl(keyspace, &key, ttl, |new, old| new > old),
        DecreaseTtl { key, ttl } => scalar::adjust_ttl(keyspace, &key, ttl, |new, old| new < old),

        DictionaryFetch { dictionary } => dictionary::fetch(keyspace, &dictionary),
        DictionaryGetFields { dictionary, fields } => {
            dictionary::get_fields(keyspace, &dictionary, &fields)
        }
        DictionarySetFields {
            dictionary,
            fields,
            ttl,
        } => dictionary::set_fields(keyspace, &dictionary, fields, ttl),
        DictionaryRemoveFields { dictionary, fields } => {
            dictionary::remove_fields(keyspace, &dictionary, &fields)
        }
        DictionaryIncrement {
            dictionary,
            field,
            amount,
            ttl,
        } => dictionary::increment(keyspace, &dictionary, field, amount, ttl),
        DictionaryLength { dictionary } => dictionary::length(keyspace, &dictionary),

        ListFetch { list, start, end } => list::fetch(keyspace, &list, start, end),
        ListLength { list } => list::length(keyspace, &list),
        ListConcatenate {
            list,
            values,
            end,
            truncate_to_size,
            ttl,
        } => list::concatenate(keyspace, &list, values, end, truncate_to_size, ttl),
        ListPop { list, end } => list::pop(keyspace, &list, end),
        ListRemoveValue { list, value } => list::remove_value(keyspace, &list, &value),
        ListRetain {
            list,
            start,
            end,
            ttl,
        } => list::retain(keyspace, &list, start, end, ttl),

        SetAddElements { set, elements, ttl } => set::add(keyspace, &set, elements, ttl),
        SetRemoveElements { set, elements } => set::remove(keyspace, &set, &elements),
        SetFetch { set } => set::fetch(keyspace, &set),
        SetContainsElements { set, elements } => set::contains(keyspace, &set, &elements),
        SetLength { set } => set::length(keyspace, &set),
        SetSample { set, limit } => set::sample(keyspace, &set, limit),
        SetPop { set, count } => set::pop(keyspace, &set, count),

        SortedSetPutElements {
            sorted_set,
            elements,
            ttl,
        } => sorted_set::put(keyspace, &sorted_set, elements, ttl),
        SortedSetFetchByRank {
            sorted_set,
            start,
            end,
            order,
        } => sorted_set::fetch_by_rank(keyspace, &sorted_set, start, end, order),
        SortedSetFetchByScore {
            sorted_set,
            min_score,
            max_score,
            order,
            offset,
            count,
        } => sorted_set::fetch_by_score(
            keyspace,
            &sorted_set,
            (min_score, max_score),
            order,
            offset,
            count,
        ),
        SortedSetGetRank {
            sorted_set,
            value,
            order,
        } => sorted_set::rank(keyspace, &sorted_set, &value, order),
        SortedSetGetScores { sorted_set, values } => {
            sorted_set::scores(keyspace, &sorted_set, &values)
        }
        SortedSetIncrementScore {
            sorted_set,
            value,
            amount,
            ttl,
        } => sorted_set::increment(keyspace, &sorted_set, value, amount, ttl),
        SortedSetRemoveElements { sorted_set, values } => {
            sorted_set::remove(keyspace, &sorted_set, &values)
        }
        SortedSetLength { sorted_set } => sorted_set::length(keyspace, &sorted_set),
        SortedSetLengthByScore {
            sorted_set,
            min_score,
            max_score,
        } => sorted_set::length_by_score(keyspace, &sorted_set, min_score, max_score),
    }
}

/// `Length` for a present collection, `Miss` otherwise.
fn length_or_miss(len: Option<usize>) -> Payload {
    match len {
        Some(len) => Payload::Length(len as u32),
        None => Payload::Miss,
    }
}
