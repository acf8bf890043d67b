//! Collection TTL policy
//!
//! Mutations of lists, dictionaries, sets and sorted sets carry a
//! [`CollectionTtl`]. The first write to a key always establishes its TTL;
//! later writes reset it only when `refresh` is set.

use crate::error::SdkError;
use std::time::Duration;

/// TTL requested by a collection mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionTtl {
    ttl_seconds: Option<f64>,
    refresh: bool,
}

impl CollectionTtl {
    /// Use the client's default TTL and refresh it on every update.
    pub fn from_cache_ttl() -> Self {
        Self {
            ttl_seconds: None,
            refresh: true,
        }
    }

    /// Explicit TTL in seconds, refreshed on every update.
    pub fn of(ttl_seconds: f64) -> Self {
        Self {
            ttl_seconds: Some(ttl_seconds),
            refresh: true,
        }
    }

    /// Refresh with `ttl_seconds` if given, otherwise with the cache default.
    pub fn refresh_ttl_if_provided(ttl_seconds: Option<f64>) -> Self {
        Self {
            ttl_seconds,
            refresh: ttl_seconds.is_some(),
        }
    }

    pub fn with_refresh_ttl_on_updates(mut self) -> Self {
        self.refresh = true;
        self
    }

    pub fn with_no_refresh_ttl_on_updates(mut self) -> Self {
        self.refresh = false;
        self
    }

    pub fn ttl_seconds(&self) -> Option<f64> {
        self.ttl_seconds
    }

    pub fn refresh(&self) -> bool {
        self.refresh
    }

    /// Validate and resolve against the client's default TTL.
    pub fn resolve(&self, default_ttl: Duration) -> Result<TtlPolicy, SdkError> {
        let ttl = match self.ttl_seconds {
            Some(secs) => validate_ttl_seconds(secs)?,
            None => default_ttl,
        };
        Ok(TtlPolicy {
            ttl,
            refresh: self.refresh,
        })
    }
}

impl Default for CollectionTtl {
    fn default() -> Self {
        Self::from_cache_ttl()
    }
}

/// A validated collection TTL, as carried in operation descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub ttl: Duration,
    pub refresh: bool,
}

impl TtlPolicy {
    pub fn new(ttl: Duration, refresh: bool) -> Self {
        Self { ttl, refresh }
    }

    /// Remaining lifetime after a mutation; see [`effective_ttl`].
    pub fn apply(&self, existing_remaining: Option<Duration>) -> Duration {
        effective_ttl(existing_remaining, self.ttl, self.refresh)
    }
}

/// Remaining lifetime of a collection after a mutation.
///
/// `existing_remaining` is `None` when the collection does not exist yet, in
/// which case the requested TTL is always established.
pub fn effective_ttl(
    existing_remaining: Option<Duration>,
    requested: Duration,
    refresh_on_update: bool,
) -> Duration {
    match existing_remaining {
        None => requested,
        Some(_) if refresh_on_update => requested,
        Some(remaining) => remaining,
    }
}

/// Item TTLs are whole, positive seconds.
pub fn validate_ttl_seconds(ttl_seconds: f64) -> Result<Duration, SdkError> {
    if !ttl_seconds.is_finite() || ttl_seconds <= 0.0 || ttl_seconds.fract() != 0.0 {
        return Err(SdkError::invalid_argument(
            "ttl must be a positive integer number of seconds",
        ));
    }
    Ok(Duration::from_secs(ttl_seconds as u64))
}

/// Resolve an optional item TTL against the client default.
pub fn resolve_item_ttl(ttl_seconds: Option<f64>, default_ttl: Duration) -> Result<Duration, SdkError> {
    ttl_seconds.map_or(Ok(default_ttl), validate_ttl_seconds)
}
