//! Compute strategies behind the dispatcher.

use async_trait::async_trait;
use jxdiff_types::DiffOptions;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{DispatchError, DispatchResult};
use crate::protocol::{handle_request, WorkerRequest, WorkerResponse};

/// Runs diff requests somewhere: on the caller's task, on a blocking thread,
/// or in another process.
///
/// Implementations should stop waiting and return
/// [`DispatchError::Cancelled`] once `cancel` fires.
#[async_trait]
pub trait DiffWorker: Send + Sync {
    async fn run(
        &self,
        request: WorkerRequest,
        cancel: CancellationToken,
    ) -> DispatchResult<WorkerResponse>;
}

/// Computes on the calling task. Used for small payloads.
#[derive(Clone, Debug, Default)]
pub struct InlineWorker {
    options: DiffOptions,
}

impl InlineWorker {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl DiffWorker for InlineWorker {
    async fn run(
        &self,
        request: WorkerRequest,
        cancel: CancellationToken,
    ) -> DispatchResult<WorkerResponse> {
        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled { id: request.id });
        }
        Ok(handle_request(&request, &self.options))
    }
}

/// Computes on tokio's blocking thread pool.
///
/// Cancellation stops the wait immediately. A computation that has already
/// started keeps its thread until it finishes and its result is dropped.
#[derive(Clone, Debug, Default)]
pub struct BlockingWorker {
    options: DiffOptions,
}

impl BlockingWorker {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl DiffWorker for BlockingWorker {
    async fn run(
        &self,
        request: WorkerRequest,
        cancel: CancellationToken,
    ) -> DispatchResult<WorkerResponse> {
        let id = request.id;
        let options = self.options.clone();
        let mut handle = tokio::task::spawn_blocking(move || handle_request(&request, &options));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                handle.abort();
                debug!(id, "blocking diff cancelled");
                Err(DispatchError::Cancelled { id })
            }
            joined = &mut handle => joined.map_err(|e| DispatchError::WorkerFailed {
                id,
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(id: u64) -> WorkerRequest {
        WorkerRequest {
            id,
            left: json!([1, 2, 3]),
            right: json!([1, 4, 3]),
        }
    }

    #[tokio::test]
    async fn inline_worker_computes() {
        let worker = InlineWorker::default();
        let response = worker.run(request(1), CancellationToken::new()).await.unwrap();
        assert!(response.success);
        assert_eq!(response.diff_result.unwrap().stats.added, 1);
    }

    #[tokio::test]
    async fn blocking_worker_computes() {
        let worker = BlockingWorker::new(DiffOptions::unordered());
        let response = worker.run(request(2), CancellationToken::new()).await.unwrap();
        assert_eq!(response.id, 2);
        let result = response.diff_result.unwrap();
        assert_eq!(result.stats.removed, 1);
        assert_eq!(result.stats.added, 1);
    }

    #[tokio::test]
    async fn cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = InlineWorker::default().run(request(5), cancel.clone()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Cancelled { id: 5 }));

        let err = BlockingWorker::default().run(request(6), cancel).await.unwrap_err();
        assert!(matches!(err, DispatchError::Cancelled { id: 6 }));
    }
}
