//! Messages exchanged with a diff worker.
//!
//! Requests and responses are plain owned data so they can cross a thread
//! or process boundary unchanged. Field names are camelCase on the wire.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use jxdiff_diff::{compare, DiffOutput};
use jxdiff_types::{DiffOptions, DiffResult, DiffTreeNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of one submitted comparison. Issued in increasing order.
pub type RequestId = u64;

const FALLBACK_ERROR: &str = "Diff worker error";

/// A comparison to run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub id: RequestId,
    pub left: Value,
    pub right: Value,
}

/// Failure details of an unsuccessful response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerFailure {
    pub message: String,
}

/// Outcome of one request.
///
/// On success `diff_result` and `diff_tree` are set; on failure `error` is.
/// `compute_time` is in milliseconds, rounded to two decimals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    pub id: RequestId,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_result: Option<DiffResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_tree: Option<DiffTreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WorkerFailure>,
    pub compute_time: f64,
}

impl WorkerResponse {
    pub fn succeeded(id: RequestId, output: DiffOutput, elapsed: Duration) -> Self {
        Self {
            id,
            success: true,
            diff_result: Some(output.result),
            diff_tree: Some(output.tree),
            error: None,
            compute_time: round_millis(elapsed),
        }
    }

    pub fn failed(id: RequestId, message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            id,
            success: false,
            diff_result: None,
            diff_tree: None,
            error: Some(WorkerFailure {
                message: message.into(),
            }),
            compute_time: round_millis(elapsed),
        }
    }

    /// Both outputs of a successful response.
    pub fn output(&self) -> Option<(&DiffResult, &DiffTreeNode)> {
        match (&self.diff_result, &self.diff_tree) {
            (Some(result), Some(tree)) if self.success => Some((result, tree)),
            _ => None,
        }
    }
}

/// Run one request to completion on the current thread.
///
/// Never panics: a panic inside the comparison becomes a failed response
/// carrying the panic message.
pub fn handle_request(request: &WorkerRequest, options: &DiffOptions) -> WorkerResponse {
    guarded(request.id, || compare(&request.left, &request.right, options))
}

fn guarded<F>(id: RequestId, compute: F) -> WorkerResponse
where
    F: FnOnce() -> DiffOutput,
{
    let start = Instant::now();
    match panic::catch_unwind(AssertUnwindSafe(compute)) {
        Ok(output) => WorkerResponse::succeeded(id, output, start.elapsed()),
        Err(payload) => WorkerResponse::failed(id, panic_message(payload.as_ref()), start.elapsed()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        FALLBACK_ERROR.to_string()
    }
}

fn round_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100_000.0).round() / 100.0
}
