//! Cache client
//!
//! Every operation follows the same path: validate arguments locally, build a
//! [`Request`], hand it to the [`Transport`], and decode the payload into the
//! operation's outcome. Validation failures never reach the transport.

mod control;
mod dictionary;
mod leaderboard;
mod list;
mod scalar;
mod set;
mod sorted_set;
mod store;
mod vector;
mod webhook;

pub use leaderboard::{Leaderboard, LeaderboardFetchByScoreOptions};
pub use list::ListPushOptions;
pub use sorted_set::{SortedSetFetchByRankOptions, SortedSetFetchByScoreOptions};
pub use store::StoreClient;
pub use vector::{SearchOptions, VectorIndexClient};
pub use webhook::WebhookClient;

use crate::config::{CacheClientConfig, CredentialProvider, OperationRecord};
use crate::error::SdkError;
use crate::request::{Payload, Request};
use crate::responses::Outcome;
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared invocation path for every client type.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    transport: Arc<dyn Transport>,
    config: Arc<CacheClientConfig>,
}

impl Dispatcher {
    pub(crate) fn new(transport: Arc<dyn Transport>, config: Arc<CacheClientConfig>) -> Self {
        Self { transport, config }
    }

    pub(crate) fn config(&self) -> &CacheClientConfig {
        &self.config
    }

    /// Run one operation. `decode` returns `None` for a payload shape the
    /// operation does not expect.
    pub(crate) async fn call<R, P, D>(
        &self,
        operation: &'static str,
        resource: &str,
        prepare: P,
        decode: D,
    ) -> R
    where
        R: Outcome,
        P: FnOnce() -> Result<Request, SdkError>,
        D: FnOnce(Payload) -> Option<R>,
    {
        self.call_with(operation, resource, prepare, decode, R::from)
            .await
    }

    /// Like [`Dispatcher::call`], with a custom mapping for transport
    /// failures (e.g. `AlreadyExists` on create).
    pub(crate) async fn call_with<R, P, D, F>(
        &self,
        operation: &'static str,
        resource: &str,
        prepare: P,
        decode: D,
        on_failure: F,
    ) -> R
    where
        R: Outcome,
        P: FnOnce() -> Result<Request, SdkError>,
        D: FnOnce(Payload) -> Option<R>,
        F: FnOnce(SdkError) -> R,
    {
        let outcome = match prepare() {
            Err(err) => R::from(err),
            Ok(request) => match self.transport.invoke(request).await {
                Ok(payload) => {
                    let kind = payload.kind();
                    decode(payload)
                        .unwrap_or_else(|| R::from(SdkError::unexpected_payload(operation, kind)))
                }
                Err(failure) => {
                    warn!(
                        operation,
                        resource,
                        status = ?failure.status,
                        "transport failure: {}",
                        failure.message
                    );
                    on_failure(SdkError::from(failure))
                }
            },
        };
        self.report(operation, resource, &outcome);
        outcome
    }

    /// Log an outcome and notify listeners. Composite operations call this
    /// once for the aggregate after their sub-requests have reported.
    pub(crate) fn report<R: Outcome>(&self, operation: &'static str, resource: &str, outcome: &R) {
        let tag = outcome.tag();
        match outcome.error() {
            Some(err) => debug!(operation, resource, tag, code = %err.code(), "{}", err),
            None => debug!(operation, resource, tag, "operation completed"),
        }
        if !self.config.listeners.is_empty() {
            self.config.listeners.notify(&OperationRecord {
                operation,
                resource: resource.to_string(),
                tag,
            });
        }
    }
}

/// Client for cache data and control operations.
///
/// Cheap to clone; clones share the transport and configuration.
///
/// # Example
///
/// ```no_run
/// use ouroboros_cache::{CacheClient, CacheClientConfig, CacheGet, CredentialProvider, Transport};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example(transport: Arc<dyn Transport>) -> Result<(), Box<dyn std::error::Error>> {
/// let client = CacheClient::builder()
///     .transport(transport)
///     .credentials(CredentialProvider::from_env_var("CACHE_API_KEY")?)
///     .config(CacheClientConfig::new(Duration::from_secs(60)))
///     .build()?;
///
/// client.set("cache", "key", "value", None).await;
/// match client.get("cache", "key").await {
///     CacheGet::Hit(value) => println!("hit: {value}"),
///     CacheGet::Miss => println!("miss"),
///     CacheGet::Error(err) => eprintln!("error: {err}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CacheClient {
    dispatcher: Dispatcher,
    credentials: Option<CredentialProvider>,
}

impl CacheClient {
    pub fn builder() -> CacheClientBuilder {
        CacheClientBuilder::default()
    }

    pub fn config(&self) -> &CacheClientConfig {
        self.dispatcher.config()
    }

    pub fn credentials(&self) -> Option<&CredentialProvider> {
        self.credentials.as_ref()
    }

    /// Store client sharing this client's transport and configuration.
    pub fn store_client(&self) -> StoreClient {
        StoreClient::from_dispatcher(self.dispatcher.clone())
    }

    /// Vector index client sharing this client's transport and configuration.
    pub fn vector_index_client(&self) -> VectorIndexClient {
        VectorIndexClient::from_dispatcher(self.dispatcher.clone())
    }

    /// Webhook client sharing this client's transport and configuration.
    pub fn webhook_client(&self) -> WebhookClient {
        WebhookClient::from_dispatcher(self.dispatcher.clone())
    }
}

/// Builder for [`CacheClient`].
#[derive(Default)]
pub struct CacheClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    credentials: Option<CredentialProvider>,
    config: Option<CacheClientConfig>,
}

impl CacheClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn credentials(mut self, credentials: CredentialProvider) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn config(mut self, config: CacheClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shorthand for a default config with the given TTL.
    pub fn default_ttl(mut self, ttl: std::time::Duration) -> Self {
        self.config = Some(self.config.unwrap_or_default().default_ttl(ttl));
        self
    }

    pub fn build(self) -> Result<CacheClient, SdkError> {
        let transport = self
            .transport
            .ok_or_else(|| SdkError::invalid_argument("a transport is required"))?;
        let config = self.config.unwrap_or_default();
        config.validate()?;
        debug!(
            default_ttl = ?config.default_ttl,
            request_timeout = ?config.request_timeout,
            max_batch_concurrency = config.max_batch_concurrency,
            "cache client created"
        );
        Ok(CacheClient {
            dispatcher: Dispatcher::new(transport, Arc::new(config)),
            credentials: self.credentials,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for unit tests.

    use super::*;
    use crate::transport::RawOutcome;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued answers and records every request it receives.
    #[derive(Default)]
    pub struct ScriptedTransport {
        answers: Mutex<VecDeque<RawOutcome>>,
        pub requests: Mutex<Vec<Request>>,
    }

    impl ScriptedTransport {
        pub fn answering(answers: Vec<RawOutcome>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn invoke(&self, request: Request) -> RawOutcome {
            self.requests.lock().unwrap().push(request);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Payload::Unit))
        }
    }

    pub fn client(transport: Arc<ScriptedTransport>) -> CacheClient {
        CacheClient::builder()
            .transport(transport)
            .default_ttl(std::time::Duration::from_secs(60))
            .build()
            .unwrap()
    }
}
