use crate::types::CacheValue;
use std::collections::{HashMap, HashSet};

outcome! {
    /// Outcome of `set_add_element(s)`. Adding a duplicate is a no-op success.
    pub enum SetAddElements {
        Success,
    }
}

outcome! {
    /// Outcome of `set_remove_element(s)`. Removing an absent element is a
    /// no-op success.
    pub enum SetRemoveElements {
        Success,
    }
}

outcome! {
    pub enum SetFetch {
        Hit(Vec<CacheValue>),
        Miss,
    }
}

impl SetFetch {
    pub fn value(&self) -> Option<HashSet<String>> {
        self.value_set_string()
    }

    pub fn value_set_string(&self) -> Option<HashSet<String>> {
        match self {
            SetFetch::Hit(elements) => Some(elements.iter().map(CacheValue::as_string).collect()),
            _ => None,
        }
    }

    pub fn value_set_bytes(&self) -> Option<HashSet<Vec<u8>>> {
        match self {
            SetFetch::Hit(elements) => {
                Some(elements.iter().map(|e| e.as_bytes().to_vec()).collect())
            }
            _ => None,
        }
    }
}

outcome! {
    pub enum SetContainsElement {
        Hit(bool),
        Miss,
    }
}

impl SetContainsElement {
    pub fn contains(&self) -> Option<bool> {
        match self {
            SetContainsElement::Hit(found) => Some(*found),
            _ => None,
        }
    }
}

outcome! {
    /// Membership flags for each requested element, in request order.
    pub enum SetContainsElements {
        Hit(Vec<(CacheValue, bool)>),
        Miss,
    }
}

impl SetContainsElements {
    pub fn contains_elements(&self) -> Option<Vec<bool>> {
        match self {
            SetContainsElements::Hit(flags) => Some(flags.iter().map(|(_, f)| *f).collect()),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<HashMap<String, bool>> {
        match self {
            SetContainsElements::Hit(flags) => {
                Some(flags.iter().map(|(e, f)| (e.as_string(), *f)).collect())
            }
            _ => None,
        }
    }
}

outcome! {
    pub enum SetLength {
        Hit(u32),
        Miss,
    }
}

impl SetLength {
    pub fn length(&self) -> Option<u32> {
        match self {
            SetLength::Hit(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    /// Up to the requested number of members; which ones is service-defined.
    pub enum SetSample {
        Hit(Vec<CacheValue>),
        Miss,
    }
}

impl SetSample {
    pub fn value(&self) -> Option<HashSet<String>> {
        match self {
            SetSample::Hit(elements) => Some(elements.iter().map(CacheValue::as_string).collect()),
            _ => None,
        }
    }
}

outcome! {
    pub enum SetPop {
        Hit(Vec<CacheValue>),
        Miss,
    }
}

impl SetPop {
    pub fn value(&self) -> Option<HashSet<String>> {
        match self {
            SetPop::Hit(elements) => Some(elements.iter().map(CacheValue::as_string).collect()),
            _ => None,
        }
    }
}
