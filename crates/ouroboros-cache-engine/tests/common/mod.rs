//! Shared setup: a client wired to a fresh in-process engine

#![allow(dead_code)]

use ouroboros_cache::{CacheClient, CacheClientConfig, CreateCache};
use ouroboros_cache_engine::LocalTransport;
use std::sync::Arc;
use std::time::Duration;

pub const CACHE: &str = "test-cache";
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn client_with(transport: LocalTransport, config: CacheClientConfig) -> CacheClient {
    CacheClient::builder()
        .transport(Arc::new(transport))
        .config(config)
        .build()
        .expect("client config is valid")
}

/// Client plus its transport, with [`CACHE`] already created.
pub async fn setup() -> (CacheClient, LocalTransport) {
    init_tracing();
    let transport = LocalTransport::default();
    let client = client_with(transport.clone(), CacheClientConfig::new(DEFAULT_TTL));
    assert_eq!(client.create_cache(CACHE).await, CreateCache::Success);
    (client, transport)
}
