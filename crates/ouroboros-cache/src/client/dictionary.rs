//! Dictionary operations

use super::CacheClient;
use crate::error::SdkError;
use crate::request::{CacheCommand, Payload, PayloadKind, Request};
use crate::responses::{
    DictionaryFetch, DictionaryGetField, DictionaryGetFields, DictionaryIncrement,
    DictionaryLength, DictionaryRemoveField, DictionaryRemoveFields, DictionarySetField,
    DictionarySetFields, FieldValue,
};
use crate::ttl::CollectionTtl;
use crate::types::{ByteLike, CacheValue};
use crate::validation::{validate_cache_name, validate_collection_name, validate_key, validate_keys};

const KIND: &str = "Dictionary";

impl CacheClient {
    pub async fn dictionary_fetch(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
    ) -> DictionaryFetch {
        let dictionary = dictionary.into();
        self.dispatcher
            .call(
                "dictionary_fetch",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &dictionary)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::DictionaryFetch {
                            dictionary: dictionary.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Pairs(pairs) => Some(DictionaryFetch::Hit(
                        pairs
                            .into_iter()
                            .map(|(f, v)| (CacheValue::new(f), CacheValue::new(v)))
                            .collect(),
                    )),
                    Payload::Miss => Some(DictionaryFetch::Miss),
                    _ => None,
                },
            )
            .await
    }

    /// `Miss` carries the requested field, whether the field or the whole
    /// dictionary is absent.
    pub async fn dictionary_get_field(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
        field: impl Into<ByteLike>,
    ) -> DictionaryGetField {
        let field = field.into();
        match self
            .dictionary_get_fields(cache_name, dictionary, [field.clone()])
            .await
        {
            DictionaryGetFields::Hit(mut responses) if responses.len() == 1 => {
                responses.remove(0)
            }
            DictionaryGetFields::Miss => {
                DictionaryGetField::Miss(CacheValue::new(field.into_bytes()))
            }
            DictionaryGetFields::Error(err) => DictionaryGetField::Error(err),
            DictionaryGetFields::Hit(_) => DictionaryGetField::Error(SdkError::unexpected_payload(
                "dictionary_get_field",
                PayloadKind::OptionalValues,
            )),
        }
    }

    pub async fn dictionary_get_fields<F: Into<ByteLike>>(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
        fields: impl IntoIterator<Item = F>,
    ) -> DictionaryGetFields {
        let dictionary = dictionary.into();
        let fields: Vec<Vec<u8>> = fields.into_iter().map(|f| f.into().into_bytes()).collect();
        let requested = fields.clone();
        self.dispatcher
            .call(
                "dictionary_get_fields",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &dictionary)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::DictionaryGetFields {
                            dictionary: dictionary.into_bytes(),
                            fields,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::OptionalValues(values) if values.len() == requested.len() => {
                        Some(DictionaryGetFields::Hit(
                            requested
                                .into_iter()
                                .zip(values)
                                .map(|(field, value)| match value {
                                    Some(value) => DictionaryGetField::Hit(FieldValue {
                                        field: CacheValue::new(field),
                                        value: CacheValue::new(value),
                                    }),
                                    None => DictionaryGetField::Miss(CacheValue::new(field)),
                                })
                                .collect(),
                        ))
                    }
                    Payload::Miss => Some(DictionaryGetFields::Miss),
                    _ => None,
                },
            )
            .await
    }

    pub async fn dictionary_set_field(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
        field: impl Into<ByteLike>,
        value: impl Into<ByteLike>,
        ttl: CollectionTtl,
    ) -> DictionarySetField {
        match self
            .set_fields(
                "dictionary_set_field",
                cache_name,
                dictionary.into(),
                vec![(field.into(), value.into())],
                ttl,
            )
            .await
        {
            Ok(()) => DictionarySetField::Success,
            Err(err) => DictionarySetField::Error(err),
        }
    }

    pub async fn dictionary_set_fields<F: Into<ByteLike>, V: Into<ByteLike>>(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
        fields: impl IntoIterator<Item = (F, V)>,
        ttl: CollectionTtl,
    ) -> DictionarySetFields {
        let fields = fields
            .into_iter()
            .map(|(f, v)| (f.into(), v.into()))
            .collect();
        match self
            .set_fields("dictionary_set_fields", cache_name, dictionary.into(), fields, ttl)
            .await
        {
            Ok(()) => DictionarySetFields::Success,
            Err(err) => DictionarySetFields::Error(err),
        }
    }

    async fn set_fields(
        &self,
        operation: &'static str,
        cache_name: &str,
        dictionary: ByteLike,
        fields: Vec<(ByteLike, ByteLike)>,
        ttl: CollectionTtl,
    ) -> Result<(), SdkError> {
        let default_ttl = self.config().default_ttl;
        let outcome: DictionarySetFields = self
            .dispatcher
            .call(
                operation,
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &dictionary)?;
                    fields.iter().try_for_each(|(f, _)| validate_key(f))?;
                    let ttl = ttl.resolve(default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::DictionarySetFields {
                            dictionary: dictionary.into_bytes(),
                            fields: fields
                                .into_iter()
                                .map(|(f, v)| (f.into_bytes(), v.into_bytes()))
                                .collect(),
                            ttl,
                        },
                    ))
                },
                |payload| matches!(payload, Payload::Unit).then_some(DictionarySetFields::Success),
            )
            .await;
        match outcome {
            DictionarySetFields::Error(err) => Err(err),
            DictionarySetFields::Success => Ok(()),
        }
    }

    pub async fn dictionary_remove_field(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
        field: impl Into<ByteLike>,
    ) -> DictionaryRemoveField {
        let field: ByteLike = field.into();
        match self
            .dictionary_remove_fields(cache_name, dictionary, [field])
            .await
        {
            DictionaryRemoveFields::Success => DictionaryRemoveField::Success,
            DictionaryRemoveFields::Error(err) => DictionaryRemoveField::Error(err),
        }
    }

    /// Removing absent fields, or fields of an absent dictionary, succeeds.
    pub async fn dictionary_remove_fields<F: Into<ByteLike>>(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
        fields: impl IntoIterator<Item = F>,
    ) -> DictionaryRemoveFields {
        let dictionary = dictionary.into();
        let fields: Vec<ByteLike> = fields.into_iter().map(Into::into).collect();
        self.dispatcher
            .call(
                "dictionary_remove_fields",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &dictionary)?;
                    validate_keys(&fields)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::DictionaryRemoveFields {
                            dictionary: dictionary.into_bytes(),
                            fields: fields.into_iter().map(ByteLike::into_bytes).collect(),
                        },
                    ))
                },
                |payload| {
                    matches!(payload, Payload::Unit).then_some(DictionaryRemoveFields::Success)
                },
            )
            .await
    }

    /// Atomically add `amount` to an integer field; a missing field counts
    /// as `0`.
    pub async fn dictionary_increment(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
        field: impl Into<ByteLike>,
        amount: i64,
        ttl: CollectionTtl,
    ) -> DictionaryIncrement {
        let (dictionary, field) = (dictionary.into(), field.into());
        let default_ttl = self.config().default_ttl;
        self.dispatcher
            .call(
                "dictionary_increment",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &dictionary)?;
                    validate_key(&field)?;
                    let ttl = ttl.resolve(default_ttl)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::DictionaryIncrement {
                            dictionary: dictionary.into_bytes(),
                            field: field.into_bytes(),
                            amount,
                            ttl,
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Integer(n) => Some(DictionaryIncrement::Success(n)),
                    _ => None,
                },
            )
            .await
    }

    pub async fn dictionary_length(
        &self,
        cache_name: &str,
        dictionary: impl Into<ByteLike>,
    ) -> DictionaryLength {
        let dictionary = dictionary.into();
        self.dispatcher
            .call(
                "dictionary_length",
                cache_name,
                || {
                    validate_cache_name(cache_name)?;
                    validate_collection_name(KIND, &dictionary)?;
                    Ok(Request::cache(
                        cache_name,
                        CacheCommand::DictionaryLength {
                            dictionary: dictionary.into_bytes(),
                        },
                    ))
                },
                |payload| match payload {
                    Payload::Length(n) => Some(DictionaryLength::Hit(n)),
                    Payload::Miss => Some(DictionaryLength::Miss),
                    _ => None,
                },
            )
            .await
    }
}
