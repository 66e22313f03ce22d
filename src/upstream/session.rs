//! Scoped access to the registry client.
//!
//! # Responsibilities
//! - Hand each request its own session over the shared client
//! - Bound concurrent sessions (backpressure toward the registry)
//! - Enforce a deadline on every upstream call
//! - Release the session on every exit path (RAII)

use futures_util::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::observability::metrics;
use crate::upstream::calls::UpstreamCall;
use crate::upstream::client::RegistryClient;
use crate::upstream::types::{UpstreamError, UpstreamPayload, UpstreamResult};

/// Shared handle from which request sessions are acquired.
#[derive(Clone)]
pub struct UpstreamPool {
    client: Arc<dyn RegistryClient>,
    permits: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    call_timeout: Duration,
}

impl UpstreamPool {
    pub fn new(client: Arc<dyn RegistryClient>, max_sessions: usize, call_timeout: Duration) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_sessions)),
            active: Arc::new(AtomicUsize::new(0)),
            call_timeout,
        }
    }

    /// Acquire a session, waiting while `max_sessions` are in use.
    pub async fn session(&self) -> UpstreamResult<UpstreamSession> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| UpstreamError::Closed)?;

        let active = self.active.fetch_add(1, Ordering::Relaxed) + 1;
        metrics::set_active_sessions(active);

        Ok(UpstreamSession {
            client: self.client.clone(),
            active: self.active.clone(),
            call_timeout: self.call_timeout,
            calls: AtomicUsize::new(0),
            _permit: permit,
        })
    }

    /// Number of sessions currently held.
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Refuse new sessions; held ones finish normally.
    pub fn close(&self) {
        self.permits.close();
    }
}

/// A request-scoped handle on the registry client. Dropping it releases
/// the slot, whether the handler returned normally, bailed with `?`, or
/// panicked.
pub struct UpstreamSession {
    client: Arc<dyn RegistryClient>,
    active: Arc<AtomicUsize>,
    call_timeout: Duration,
    calls: AtomicUsize,
    _permit: OwnedSemaphorePermit,
}

impl UpstreamSession {
    /// Issue one upstream call under the configured deadline.
    pub async fn fetch(&self, call: UpstreamCall) -> UpstreamResult<UpstreamPayload> {
        let name = call.name();
        let start = Instant::now();
        self.calls.fetch_add(1, Ordering::Relaxed);

        let result = match tokio::time::timeout(self.call_timeout, self.client.fetch(&call)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout {
                call: name,
                after: self.call_timeout,
            }),
        };

        let outcome = match &result {
            Ok(payload) if payload.is_truthy() => "found",
            Ok(_) => "empty",
            Err(_) => "error",
        };
        metrics::record_upstream_call(name, outcome, start);
        tracing::debug!(call = name, outcome, elapsed_ms = start.elapsed().as_millis() as u64, "Upstream call finished");

        result
    }

    /// Issue independent calls concurrently. Every call runs to completion
    /// before this returns; the first failure in input order is reported.
    pub async fn fetch_all(
        &self,
        calls: impl IntoIterator<Item = UpstreamCall>,
    ) -> UpstreamResult<Vec<UpstreamPayload>> {
        join_all(calls.into_iter().map(|call| self.fetch(call)))
            .await
            .into_iter()
            .collect()
    }

    /// Calls issued through this session so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Drop for UpstreamSession {
    fn drop(&mut self) {
        let active = self.active.fetch_sub(1, Ordering::Relaxed) - 1;
        metrics::set_active_sessions(active);
        tracing::trace!(calls = self.call_count(), "Upstream session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::{BoxFuture, FutureExt};
    use serde_json::json;

    struct SlowClient {
        delay: Duration,
    }

    impl RegistryClient for SlowClient {
        fn fetch<'a>(&'a self, call: &'a UpstreamCall) -> BoxFuture<'a, UpstreamResult<UpstreamPayload>> {
            async move {
                tokio::time::sleep(self.delay).await;
                match call {
                    UpstreamCall::ProgramCount => Err(UpstreamError::Other("program count exploded".into())),
                    _ => Ok(UpstreamPayload::from(json!({"jumlah": 1}))),
                }
            }
            .boxed()
        }
    }

    fn pool(delay: Duration, timeout: Duration, max: usize) -> UpstreamPool {
        UpstreamPool::new(Arc::new(SlowClient { delay }), max, timeout)
    }

    #[tokio::test]
    async fn test_session_released_on_drop() {
        let pool = pool(Duration::ZERO, Duration::from_secs(1), 2);
        {
            let _a = pool.session().await.unwrap();
            let _b = pool.session().await.unwrap();
            assert_eq!(pool.active_sessions(), 2);
        }
        assert_eq!(pool.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_session_released_after_error() {
        let pool = pool(Duration::ZERO, Duration::from_secs(1), 1);
        let attempt = async {
            let session = pool.session().await?;
            session.fetch(UpstreamCall::ProgramCount).await?;
            Ok::<_, UpstreamError>(())
        };
        assert!(attempt.await.is_err());
        assert_eq!(pool.active_sessions(), 0);
        assert!(pool.session().await.is_ok());
    }

    #[tokio::test]
    async fn test_call_deadline() {
        let pool = pool(Duration::from_millis(200), Duration::from_millis(20), 1);
        let session = pool.session().await.unwrap();
        let err = session.fetch(UpstreamCall::UniversityCount).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout { call: "university_count", .. }));
    }

    #[tokio::test]
    async fn test_fetch_all_reports_first_failure_after_all_calls() {
        let pool = pool(Duration::from_millis(5), Duration::from_secs(1), 1);
        let session = pool.session().await.unwrap();
        let err = session
            .fetch_all([
                UpstreamCall::UniversityCount,
                UpstreamCall::ProgramCount,
                UpstreamCall::ActiveStudentCount,
            ])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "program count exploded");
        assert_eq!(session.call_count(), 3);
    }

    #[tokio::test]
    async fn test_closed_pool_refuses_sessions() {
        let pool = pool(Duration::ZERO, Duration::from_secs(1), 1);
        pool.close();
        assert!(matches!(pool.session().await, Err(UpstreamError::Closed)));
    }
}
