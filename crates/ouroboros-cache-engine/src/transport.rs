//! [`Transport`] implementation backed by an in-process [`CacheEngine`]

use crate::engine::CacheEngine;
use async_trait::async_trait;
use ouroboros_cache::{RawOutcome, Request, Transport, TransportFailure};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::warn;

/// Executes requests directly against a shared engine.
///
/// Failures queued with [`LocalTransport::fail_next`] are returned, one per
/// call and in order, instead of executing the next requests.
#[derive(Clone)]
pub struct LocalTransport {
    engine: Arc<CacheEngine>,
    faults: Arc<Mutex<VecDeque<TransportFailure>>>,
}

impl LocalTransport {
    pub fn new(engine: Arc<CacheEngine>) -> Self {
        Self {
            engine,
            faults: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn engine(&self) -> &Arc<CacheEngine> {
        &self.engine
    }

    /// Make the next call fail with `failure` without reaching the engine.
    pub fn fail_next(&self, failure: TransportFailure) {
        self.faults.lock().push_back(failure);
    }

    pub fn pending_faults(&self) -> usize {
        self.faults.lock().len()
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new(Arc::new(CacheEngine::new()))
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn invoke(&self, request: Request) -> RawOutcome {
        let fault = self.faults.lock().pop_front();
        if let Some(failure) = fault {
            warn!(status = ?failure.status, "injected transport failure");
            return Err(failure);
        }
        self.engine.execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ouroboros_cache::{ControlCommand, Payload, TransportStatus};

    #[tokio::test]
    async fn test_fault_is_one_shot() {
        let transport = LocalTransport::default();
        transport.fail_next(TransportFailure::timeout("slow"));
        assert_eq!(transport.pending_faults(), 1);

        let first = transport
            .invoke(Request::Control(ControlCommand::ListCaches))
            .await;
        assert_eq!(first.unwrap_err().status, TransportStatus::DeadlineExceeded);

        let second = transport
            .invoke(Request::Control(ControlCommand::ListCaches))
            .await;
        assert_eq!(second, Ok(Payload::Caches(vec![])));
    }

    #[test]
    fn test_clones_share_engine_and_faults() {
        let transport = LocalTransport::default();
        let clone = transport.clone();
        clone.fail_next(TransportFailure::new(TransportStatus::Unavailable, "down"));
        assert_eq!(transport.pending_faults(), 1);

        let create = Request::Control(ControlCommand::CreateCache {
            name: "cache".into(),
        });
        assert!(tokio_test::block_on(transport.invoke(create.clone())).is_err());
        assert_eq!(tokio_test::block_on(clone.invoke(create)), Ok(Payload::Unit));
        assert!(Arc::ptr_eq(transport.engine(), clone.engine()));
    }
}
