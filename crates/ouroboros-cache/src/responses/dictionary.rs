use crate::types::CacheValue;
use std::collections::HashMap;

outcome! {
    /// Outcome of `dictionary_fetch`: every field of the dictionary.
    pub enum DictionaryFetch {
        Hit(Vec<(CacheValue, CacheValue)>),
        Miss,
    }
}

impl DictionaryFetch {
    /// Natural view: text fields to text values.
    pub fn value(&self) -> Option<HashMap<String, String>> {
        self.value_map_string()
    }

    pub fn value_map_string(&self) -> Option<HashMap<String, String>> {
        match self {
            DictionaryFetch::Hit(fields) => Some(
                fields
                    .iter()
                    .map(|(k, v)| (k.as_string(), v.as_string()))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn value_map_bytes(&self) -> Option<HashMap<Vec<u8>, Vec<u8>>> {
        match self {
            DictionaryFetch::Hit(fields) => Some(
                fields
                    .iter()
                    .map(|(k, v)| (k.as_bytes().to_vec(), v.as_bytes().to_vec()))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DictionaryFetch::Hit(fields) => fields.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A dictionary field together with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub field: CacheValue,
    pub value: CacheValue,
}

outcome! {
    /// Outcome of `dictionary_get_field`. `Miss` carries the requested field.
    pub enum DictionaryGetField {
        Hit(FieldValue),
        Miss(CacheValue),
    }
}

impl DictionaryGetField {
    pub fn value(&self) -> Option<String> {
        self.value_string()
    }

    pub fn value_string(&self) -> Option<String> {
        match self {
            DictionaryGetField::Hit(fv) => Some(fv.value.as_string()),
            _ => None,
        }
    }

    pub fn value_bytes(&self) -> Option<&[u8]> {
        match self {
            DictionaryGetField::Hit(fv) => Some(fv.value.as_bytes()),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&CacheValue> {
        match self {
            DictionaryGetField::Hit(fv) => Some(&fv.field),
            DictionaryGetField::Miss(field) => Some(field),
            DictionaryGetField::Error(_) => None,
        }
    }
}

outcome! {
    /// Outcome of `dictionary_get_fields`. `Hit` carries one sub-outcome per
    /// requested field, in request order; `Miss` means the dictionary is absent.
    pub enum DictionaryGetFields {
        Hit(Vec<DictionaryGetField>),
        Miss,
    }
}

impl DictionaryGetFields {
    /// Text map of the fields that were found.
    pub fn value(&self) -> Option<HashMap<String, String>> {
        match self {
            DictionaryGetFields::Hit(responses) => Some(
                responses
                    .iter()
                    .filter_map(|r| match r {
                        DictionaryGetField::Hit(fv) => {
                            Some((fv.field.as_string(), fv.value.as_string()))
                        }
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn responses(&self) -> Option<&[DictionaryGetField]> {
        match self {
            DictionaryGetFields::Hit(responses) => Some(responses),
            _ => None,
        }
    }
}

outcome! {
    pub enum DictionarySetField {
        Success,
    }
}

outcome! {
    pub enum DictionarySetFields {
        Success,
    }
}

outcome! {
    pub enum DictionaryRemoveField {
        Success,
    }
}

outcome! {
    pub enum DictionaryRemoveFields {
        Success,
    }
}

outcome! {
    /// Outcome of `dictionary_increment`; carries the field value afterwards.
    pub enum DictionaryIncrement {
        Success(i64),
    }
}

impl DictionaryIncrement {
    pub fn value(&self) -> Option<i64> {
        match self {
            DictionaryIncrement::Success(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    pub enum DictionaryLength {
        Hit(u32),
        Miss,
    }
}

impl DictionaryLength {
    pub fn length(&self) -> Option<u32> {
        match self {
            DictionaryLength::Hit(n) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cv(s: &str) -> CacheValue {
        CacheValue::new(s.as_bytes().to_vec())
    }

    #[test]
    fn test_fetch_maps() {
        let fetch = DictionaryFetch::Hit(vec![(cv("a"), cv("1")), (cv("b"), cv("2"))]);
        let map = fetch.value().unwrap();
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert_eq!(fetch.len(), 2);
        assert_eq!(fetch.value_map_bytes().unwrap().len(), 2);
        assert_eq!(DictionaryFetch::Miss.value(), None);
        assert!(DictionaryFetch::Miss.is_empty());
    }

    #[test]
    fn test_get_fields_value_skips_misses() {
        let outcome = DictionaryGetFields::Hit(vec![
            DictionaryGetField::Hit(FieldValue {
                field: cv("a"),
                value: cv("1"),
            }),
            DictionaryGetField::Miss(cv("b")),
        ]);
        let map = outcome.value().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(outcome.responses().unwrap()[1].field(), Some(&cv("b")));
    }
}
