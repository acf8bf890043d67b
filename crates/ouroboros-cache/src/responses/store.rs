use crate::types::{StoreInfo, StoreValue};

outcome! {
    pub enum CreateStore {
        Success,
        AlreadyExists,
    }
}

outcome! {
    pub enum DeleteStore {
        Success,
    }
}

outcome! {
    pub enum ListStores {
        Success(Vec<StoreInfo>),
    }
}

impl ListStores {
    pub fn stores(&self) -> Option<&[StoreInfo]> {
        match self {
            ListStores::Success(stores) => Some(stores),
            _ => None,
        }
    }
}

outcome! {
    pub enum StorePut {
        Success,
    }
}

outcome! {
    /// Outcome of a store `get`.
    pub enum StoreGet {
        Found(StoreValue),
        NotFound,
    }
}

impl StoreGet {
    pub fn value(&self) -> Option<&StoreValue> {
        match self {
            StoreGet::Found(value) => Some(value),
            _ => None,
        }
    }
}

outcome! {
    pub enum StoreDelete {
        Success,
    }
}
