use std::time::Duration;

use thiserror::Error;

use crate::protocol::RequestId;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("request {id} was cancelled")]
    Cancelled { id: RequestId },

    #[error("request {id} timed out after {timeout:?}")]
    Timeout { id: RequestId, timeout: Duration },

    #[error("worker failed on request {id}: {message}")]
    WorkerFailed { id: RequestId, message: String },
}

pub type DispatchResult<T> = Result<T, DispatchError>;
