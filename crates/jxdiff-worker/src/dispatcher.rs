//! Latest-wins dispatch of diff requests.
//!
//! Every submission gets a fresh [`RequestId`] and cancels the one before
//! it. A response is only handed back if its request is still the latest
//! when it arrives; otherwise the caller learns it was superseded.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DispatchConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::protocol::{RequestId, WorkerRequest, WorkerResponse};
use crate::worker::{BlockingWorker, DiffWorker, InlineWorker};

/// Where the dispatcher stands with respect to the latest request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Pending(RequestId),
    Completed(RequestId),
}

/// What a submission resolved to.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// The request was still the latest when its response arrived.
    Completed(WorkerResponse),
    /// A newer request was submitted meanwhile; the response was discarded.
    Superseded { id: RequestId },
}

/// Id allocation and the latest marker share one lock, so the most
/// recently issued id is always the one recorded as latest.
struct Inner {
    next_id: RequestId,
    state: DispatchState,
    latest: Option<RequestId>,
    cancel: Option<CancellationToken>,
}

/// Routes requests to an inline or an offload worker by payload size and
/// suppresses stale responses.
pub struct DiffDispatcher {
    config: DispatchConfig,
    inline: Arc<dyn DiffWorker>,
    offload: Arc<dyn DiffWorker>,
    inner: Mutex<Inner>,
}

impl DiffDispatcher {
    /// Dispatcher with an [`InlineWorker`] and a [`BlockingWorker`], both
    /// using the configured diff options.
    pub fn new(config: DispatchConfig) -> Self {
        let inline = Arc::new(InlineWorker::new(config.options.clone()));
        let offload = Arc::new(BlockingWorker::new(config.options.clone()));
        Self::with_workers(config, inline, offload)
    }

    pub fn with_workers(
        config: DispatchConfig,
        inline: Arc<dyn DiffWorker>,
        offload: Arc<dyn DiffWorker>,
    ) -> Self {
        Self {
            config,
            inline,
            offload,
            inner: Mutex::new(Inner {
                next_id: 0,
                state: DispatchState::Idle,
                latest: None,
                cancel: None,
            }),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn state(&self) -> DispatchState {
        self.lock().state
    }

    /// Id of the most recent submission.
    pub fn latest(&self) -> Option<RequestId> {
        self.lock().latest
    }

    /// Submit a comparison, sizing the payload by serializing both sides.
    pub async fn submit(&self, left: Value, right: Value) -> DispatchResult<DispatchOutcome> {
        let size = payload_size(&left, &right);
        self.submit_sized(left, right, size).await
    }

    /// Submit a comparison whose payload size is already known, e.g. the
    /// length of the raw input text.
    pub async fn submit_sized(
        &self,
        left: Value,
        right: Value,
        payload_chars: usize,
    ) -> DispatchResult<DispatchOutcome> {
        let cancel = CancellationToken::new();
        let id = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            if let Some(previous) = inner.cancel.replace(cancel.clone()) {
                previous.cancel();
            }
            inner.latest = Some(id);
            inner.state = DispatchState::Pending(id);
            id
        };

        let offload = payload_chars >= self.config.offload_threshold_chars;
        let worker = if offload { &self.offload } else { &self.inline };
        debug!(id, payload_chars, offload, "dispatching diff request");

        let request = WorkerRequest { id, left, right };
        let run = worker.run(request, cancel.clone());
        let outcome = match self.config.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, run).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    cancel.cancel();
                    Err(DispatchError::Timeout { id, timeout })
                }
            },
            None => run.await,
        };

        let mut inner = self.lock();
        if inner.latest != Some(id) {
            debug!(id, latest = ?inner.latest, "discarding superseded diff response");
            return Ok(DispatchOutcome::Superseded { id });
        }
        inner.cancel = None;
        match outcome {
            Ok(response) => {
                inner.state = DispatchState::Completed(id);
                info!(id, success = response.success, compute_ms = response.compute_time, "diff completed");
                Ok(DispatchOutcome::Completed(response))
            }
            Err(err) => {
                inner.state = DispatchState::Idle;
                warn!(id, error = %err, "diff request failed");
                Err(err)
            }
        }
    }

    /// Cancel the in-flight request, if any. Its caller resolves to
    /// [`DispatchOutcome::Superseded`].
    pub fn cancel(&self) {
        let mut inner = self.lock();
        if let Some(token) = inner.cancel.take() {
            token.cancel();
        }
        inner.latest = None;
        inner.state = DispatchState::Idle;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serialized length of both documents in bytes, measured without
/// allocating the text.
pub fn payload_size(left: &Value, right: &Value) -> usize {
    let mut counter = ByteCounter(0);
    for value in [left, right] {
        // The sink never fails and a Value always serializes.
        let _ = serde_json::to_writer(&mut counter, value);
    }
    counter.0
}

struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::handle_request;
    use async_trait::async_trait;
    use jxdiff_types::DiffOptions;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Holds request 1 until it is cancelled, then answers anyway, like a
    /// worker whose late response arrives after a newer submission.
    struct LateFirstWorker;

    #[async_trait]
    impl DiffWorker for LateFirstWorker {
        async fn run(
            &self,
            request: WorkerRequest,
            cancel: CancellationToken,
        ) -> DispatchResult<WorkerResponse> {
            if request.id == 1 {
                cancel.cancelled().await;
            }
            Ok(handle_request(&request, &DiffOptions::default()))
        }
    }

    struct HangingWorker;

    #[async_trait]
    impl DiffWorker for HangingWorker {
        async fn run(
            &self,
            _request: WorkerRequest,
            _cancel: CancellationToken,
        ) -> DispatchResult<WorkerResponse> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct CountingWorker {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DiffWorker for CountingWorker {
        async fn run(
            &self,
            request: WorkerRequest,
            _cancel: CancellationToken,
        ) -> DispatchResult<WorkerResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(handle_request(&request, &DiffOptions::default()))
        }
    }

    /// Parks every request until it is cancelled or the gate opens.
    #[derive(Default)]
    struct GatedWorker {
        started: AtomicUsize,
        gate: CancellationToken,
    }

    #[async_trait]
    impl DiffWorker for GatedWorker {
        async fn run(
            &self,
            request: WorkerRequest,
            cancel: CancellationToken,
        ) -> DispatchResult<WorkerResponse> {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = self.gate.cancelled() => {}
            }
            Ok(handle_request(&request, &DiffOptions::default()))
        }
    }

    fn completed(outcome: DispatchOutcome) -> WorkerResponse {
        match outcome {
            DispatchOutcome::Completed(response) => response,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn small_payload_completes_inline() {
        let dispatcher = DiffDispatcher::new(DispatchConfig::default());
        assert_eq!(dispatcher.state(), DispatchState::Idle);

        let outcome = dispatcher.submit(json!({"a": 1}), json!({"a": 2})).await.unwrap();
        let response = completed(outcome);
        assert_eq!(response.id, 1);
        assert_eq!(response.diff_result.unwrap().stats.modified, 1);
        assert_eq!(dispatcher.state(), DispatchState::Completed(1));
    }

    #[tokio::test]
    async fn routes_by_payload_size() {
        let inline = Arc::new(CountingWorker::default());
        let offload = Arc::new(CountingWorker::default());
        let config = DispatchConfig {
            offload_threshold_chars: 10,
            ..Default::default()
        };
        let dispatcher = DiffDispatcher::with_workers(config, inline.clone(), offload.clone());

        dispatcher.submit(json!(1), json!(2)).await.unwrap();
        dispatcher
            .submit(json!({"key": "value"}), json!({"key": "other"}))
            .await
            .unwrap();
        dispatcher.submit_sized(json!(1), json!(1), 10).await.unwrap();

        assert_eq!(inline.calls.load(Ordering::SeqCst), 1);
        assert_eq!(offload.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn offloaded_requests_run_on_blocking_pool() {
        let config = DispatchConfig {
            offload_threshold_chars: 0,
            ..Default::default()
        };
        let dispatcher = DiffDispatcher::new(config);
        let response = completed(dispatcher.submit(json!([1, 2]), json!([2])).await.unwrap());
        assert!(response.success);
        assert_eq!(response.diff_result.unwrap().stats.removed, 1);
    }

    #[tokio::test]
    async fn stale_response_is_superseded() {
        let worker = Arc::new(LateFirstWorker);
        let dispatcher = Arc::new(DiffDispatcher::with_workers(
            DispatchConfig::default(),
            worker.clone(),
            worker,
        ));

        let first = tokio::spawn({
            let dispatcher = dispatcher.clone();
            async move { dispatcher.submit(json!(1), json!(2)).await }
        });
        while dispatcher.latest() != Some(1) {
            tokio::task::yield_now().await;
        }

        let second = completed(dispatcher.submit(json!(1), json!(3)).await.unwrap());
        assert_eq!(second.id, 2);

        let first = first.await.unwrap().unwrap();
        assert_eq!(first, DispatchOutcome::Superseded { id: 1 });
        assert_eq!(dispatcher.state(), DispatchState::Completed(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_keep_the_highest_id() {
        let worker = Arc::new(GatedWorker::default());
        let dispatcher = Arc::new(DiffDispatcher::with_workers(
            DispatchConfig::default(),
            worker.clone(),
            worker.clone(),
        ));

        let handles: Vec<_> = (0..32)
            .map(|n| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move { dispatcher.submit(json!(0), json!(n)).await })
            })
            .collect();
        while worker.started.load(Ordering::SeqCst) < 32 {
            tokio::task::yield_now().await;
        }
        worker.gate.cancel();

        let mut winners = Vec::new();
        for handle in handles {
            if let DispatchOutcome::Completed(response) = handle.await.unwrap().unwrap() {
                winners.push(response.id);
            }
        }
        assert_eq!(winners, vec![32]);
        assert_eq!(dispatcher.latest(), Some(32));
        assert_eq!(dispatcher.state(), DispatchState::Completed(32));
    }

    #[tokio::test]
    async fn timeout_surfaces_as_error() {
        let config = DispatchConfig {
            timeout: Some(Duration::from_millis(20)),
            ..Default::default()
        };
        let worker = Arc::new(HangingWorker);
        let dispatcher = DiffDispatcher::with_workers(config, worker.clone(), worker);

        let err = dispatcher.submit(json!(1), json!(2)).await.unwrap_err();
        assert!(matches!(err, DispatchError::Timeout { id: 1, .. }));
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[tokio::test]
    async fn explicit_cancel_supersedes() {
        let worker = Arc::new(LateFirstWorker);
        let dispatcher = Arc::new(DiffDispatcher::with_workers(
            DispatchConfig::default(),
            worker.clone(),
            worker,
        ));
        let pending = tokio::spawn({
            let dispatcher = dispatcher.clone();
            async move { dispatcher.submit(json!(1), json!(2)).await }
        });
        while dispatcher.latest() != Some(1) {
            tokio::task::yield_now().await;
        }
        dispatcher.cancel();

        let outcome = pending.await.unwrap().unwrap();
        assert_eq!(outcome, DispatchOutcome::Superseded { id: 1 });
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn payload_size_matches_compact_json() {
        let left = json!({"a": [1, 2, "x"]});
        let right = json!(null);
        let expected = left.to_string().len() + right.to_string().len();
        assert_eq!(payload_size(&left, &right), expected);
    }
}
