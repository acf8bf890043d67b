//! Client configuration
//!
//! Credentials and tuning are explicit values handed to the client at
//! construction. Nothing here reads process-wide state after construction.

use crate::error::{ErrorCode, SdkError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// API key plus optional endpoint override.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialProvider {
    api_key: String,
    endpoint: Option<String>,
}

impl CredentialProvider {
    pub fn from_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: None,
        }
    }

    /// Read the API key from `var` once.
    pub fn from_env_var(var: &str) -> Result<Self, SdkError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::from_api_key(key)),
            _ => Err(SdkError::new(
                ErrorCode::Authentication,
                format!("environment variable {var} is not set or empty"),
            )),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialProvider")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// One completed operation, as reported to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub operation: &'static str,
    /// Cache, store or index the operation addressed.
    pub resource: String,
    /// Outcome variant name (`"Hit"`, `"Miss"`, `"Error"`, ...).
    pub tag: &'static str,
}

/// Hook for structured reporting of outcome tags.
pub trait OutcomeListener: Send + Sync {
    fn on_outcome(&self, record: &OperationRecord);
}

#[derive(Clone, Default)]
pub struct OutcomeListeners(Vec<Arc<dyn OutcomeListener>>);

impl OutcomeListeners {
    pub fn notify(&self, record: &OperationRecord) {
        for listener in &self.0 {
            listener.on_outcome(record);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for OutcomeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutcomeListeners({})", self.0.len())
    }
}

/// Cache client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheClientConfig {
    /// TTL applied when an operation does not give one
    pub default_ttl: Duration,
    /// Deadline handed to the transport; not enforced by the client
    pub request_timeout: Duration,
    /// Sub-requests in flight at once during batch operations
    pub max_batch_concurrency: usize,
    #[serde(skip)]
    pub listeners: OutcomeListeners,
}

impl Default for CacheClientConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(60),
            request_timeout: Duration::from_secs(5),
            max_batch_concurrency: 10,
            listeners: OutcomeListeners::default(),
        }
    }
}

impl CacheClientConfig {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            ..Default::default()
        }
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn max_batch_concurrency(mut self, n: usize) -> Self {
        self.max_batch_concurrency = n;
        self
    }

    pub fn listener(mut self, listener: Arc<dyn OutcomeListener>) -> Self {
        self.listeners.0.push(listener);
        self
    }

    /// Read the plain fields from JSON. Absent fields take their defaults;
    /// listeners are registered afterwards.
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| SdkError::invalid_argument(format!("invalid client config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values a client cannot run with.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.default_ttl.is_zero() || self.default_ttl.subsec_nanos() != 0 {
            return Err(SdkError::invalid_argument(
                "default ttl must be a positive integer number of seconds",
            ));
        }
        if self.max_batch_concurrency == 0 {
            return Err(SdkError::invalid_argument(
                "max batch concurrency must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<OperationRecord>>);

    impl OutcomeListener for Recorder {
        fn on_outcome(&self, record: &OperationRecord) {
            self.0.lock().unwrap().push(record.clone());
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = CacheClientConfig::default();
        assert_eq!(config.default_ttl, Duration::from_secs(60));
        assert_eq!(config.max_batch_concurrency, 10);
        assert!(config.listeners.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CacheClientConfig::new(Duration::from_secs(30))
            .request_timeout(Duration::from_secs(1))
            .max_batch_concurrency(4);
        assert_eq!(config.default_ttl, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.max_batch_concurrency, 4);
    }

    #[test]
    fn test_config_rejects_zero_ttl() {
        let err = CacheClientConfig::new(Duration::ZERO).validate().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let err = CacheClientConfig::default()
            .max_batch_concurrency(0)
            .validate()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = CacheClientConfig::new(Duration::from_secs(120));
        let json = serde_json::to_string(&config).unwrap();
        let back = CacheClientConfig::from_json(&json).unwrap();
        assert_eq!(back.default_ttl, Duration::from_secs(120));
        assert_eq!(back.max_batch_concurrency, 10);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = CacheClientConfig::from_json(r#"{"max_batch_concurrency": 3}"#).unwrap();
        assert_eq!(config.max_batch_concurrency, 3);
        assert_eq!(config.default_ttl, Duration::from_secs(60));

        let err = CacheClientConfig::from_json(r#"{"max_batch_concurrency": 0}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(CacheClientConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_listeners_notified() {
        let recorder = Arc::new(Recorder::default());
        let config = CacheClientConfig::default().listener(recorder.clone());
        config.listeners.notify(&OperationRecord {
            operation: "get",
            resource: "cache".into(),
            tag: "Miss",
        });
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
        assert_eq!(config.listeners.len(), 1);
    }

    #[test]
    fn test_credentials_redacted() {
        let creds = CredentialProvider::from_api_key("secret-key").with_endpoint("cache.local");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret-key"));
        assert_eq!(creds.endpoint(), Some("cache.local"));
        assert_eq!(creds.api_key(), "secret-key");
    }

    #[test]
    fn test_credentials_missing_env_var() {
        let err = CredentialProvider::from_env_var("OUROBOROS_CACHE_TEST_UNSET_KEY").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Authentication);
    }
}
