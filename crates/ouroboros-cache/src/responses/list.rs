use crate::types::CacheValue;

outcome! {
    pub enum ListFetch {
        Hit(Vec<CacheValue>),
        Miss,
    }
}

impl ListFetch {
    pub fn value(&self) -> Option<Vec<String>> {
        self.value_list_string()
    }

    pub fn value_list_string(&self) -> Option<Vec<String>> {
        match self {
            ListFetch::Hit(values) => Some(values.iter().map(CacheValue::as_string).collect()),
            _ => None,
        }
    }

    pub fn value_list_bytes(&self) -> Option<Vec<Vec<u8>>> {
        match self {
            ListFetch::Hit(values) => Some(values.iter().map(|v| v.as_bytes().to_vec()).collect()),
            _ => None,
        }
    }
}

outcome! {
    pub enum ListLength {
        Hit(u32),
        Miss,
    }
}

impl ListLength {
    pub fn length(&self) -> Option<u32> {
        match self {
            ListLength::Hit(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    /// Outcome of `list_push_front`/`list_push_back`; carries the new length.
    pub enum ListPush {
        Success(u32),
    }
}

impl ListPush {
    pub fn list_length(&self) -> Option<u32> {
        match self {
            ListPush::Success(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    /// Outcome of `list_concatenate_front`/`list_concatenate_back`.
    pub enum ListConcatenate {
        Success(u32),
    }
}

impl ListConcatenate {
    pub fn list_length(&self) -> Option<u32> {
        match self {
            ListConcatenate::Success(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    pub enum ListPop {
        Hit(CacheValue),
        Miss,
    }
}

impl ListPop {
    pub fn value(&self) -> Option<String> {
        match self {
            ListPop::Hit(v) => Some(v.as_string()),
            _ => None,
        }
    }

    pub fn value_bytes(&self) -> Option<&[u8]> {
        match self {
            ListPop::Hit(v) => Some(v.as_bytes()),
            _ => None,
        }
    }
}

outcome! {
    pub enum ListRemoveValue {
        Success,
    }
}

outcome! {
    pub enum ListRetain {
        Success,
    }
}
