use crate::types::CacheInfo;

outcome! {
    pub enum CreateCache {
        Success,
        /// A cache with this name already exists; not an error.
        AlreadyExists,
    }
}

outcome! {
    pub enum DeleteCache {
        Success,
    }
}

outcome! {
    pub enum ListCaches {
        Success(Vec<CacheInfo>),
    }
}

impl ListCaches {
    pub fn caches(&self) -> Option<&[CacheInfo]> {
        match self {
            ListCaches::Success(caches) => Some(caches),
            _ => None,
        }
    }
}

outcome! {
    pub enum CacheFlush {
        Success,
    }
}
