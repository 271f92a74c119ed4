//! Worker boundary and dispatcher for jxdiff computations.
//!
//! Comparisons of large documents are moved off the caller's task, and only
//! the result of the most recent request is ever delivered.
//!
//! # Key Types
//!
//! - [`WorkerRequest`] / [`WorkerResponse`] -- Messages crossing the worker boundary
//! - [`DiffWorker`] -- Compute strategy ([`InlineWorker`], [`BlockingWorker`])
//! - [`DiffDispatcher`] -- Size-based routing with latest-wins semantics
//! - [`DispatchConfig`] -- Offload threshold, timeout and diff options

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod worker;

pub use config::{DispatchConfig, DEFAULT_OFFLOAD_THRESHOLD};
pub use dispatcher::{payload_size, DiffDispatcher, DispatchOutcome, DispatchState};
pub use error::{DispatchError, DispatchResult};
pub use protocol::{handle_request, RequestId, WorkerFailure, WorkerRequest, WorkerResponse};
pub use tokio_util::sync::CancellationToken;
pub use worker::{BlockingWorker, DiffWorker, InlineWorker};
