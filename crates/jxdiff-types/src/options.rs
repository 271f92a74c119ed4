use serde::{Deserialize, Serialize};

/// Sequences longer than this use the linear comparison instead of LCS.
pub const DEFAULT_LCS_THRESHOLD: usize = 5000;

/// Switches controlling how two documents are compared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Compare arrays as ordered sequences (LCS). When `false`, arrays are
    /// matched as multisets.
    pub array_order_matters: bool,
    /// Treat loosely equal primitives (`"1"` and `1`) as equal.
    pub ignore_type_diff: bool,
    /// Maximum sequence length handled by the quadratic LCS table.
    pub lcs_threshold: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            array_order_matters: true,
            ignore_type_diff: false,
            lcs_threshold: DEFAULT_LCS_THRESHOLD,
        }
    }
}

impl DiffOptions {
    /// Options with multiset array matching.
    pub fn unordered() -> Self {
        Self {
            array_order_matters: false,
            ..Default::default()
        }
    }
}
