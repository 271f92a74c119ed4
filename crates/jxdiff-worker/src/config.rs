use std::time::Duration;

use jxdiff_types::DiffOptions;
use serde::{Deserialize, Serialize};

/// Payloads at or above this many serialized bytes are computed off-task.
pub const DEFAULT_OFFLOAD_THRESHOLD: usize = 300_000;

/// How the dispatcher picks a worker and bounds its run time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub offload_threshold_chars: usize,
    /// Give up on a request after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub options: DiffOptions,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            offload_threshold_chars: DEFAULT_OFFLOAD_THRESHOLD,
            timeout: None,
            options: DiffOptions::default(),
        }
    }
}
