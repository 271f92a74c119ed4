//! Error types for the diff crate.

use jxdiff_types::PointerError;

/// Why a single patch operation could not be applied.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PatchFailure {
    /// The operation path is not a valid JSON Pointer.
    #[error(transparent)]
    Pointer(#[from] PointerError),

    /// Nothing exists at the addressed location.
    #[error("no value at this location")]
    NotFound,

    /// An array segment is not a usable index.
    #[error("invalid array index {0:?}")]
    InvalidIndex(String),

    /// The parent of the addressed location is not a container.
    #[error("parent is not an object or array")]
    NotAContainer,

    /// The root document cannot be removed.
    #[error("cannot remove the document root")]
    RemoveRoot,

    /// A `move` whose target lies inside its own source.
    #[error("cannot move a value into one of its children")]
    MoveIntoSelf,

    /// A `test` operation found a different value.
    #[error("test failed: value differs")]
    TestFailed,
}

/// A patch operation that failed, with its position in the patch.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("patch operation {index} ({op} {path:?}) failed: {failure}")]
pub struct PatchError {
    /// Zero-based position of the operation in the patch.
    pub index: usize,
    /// The `op` member of the failing operation.
    pub op: &'static str,
    /// Target path of the failing operation.
    pub path: String,
    #[source]
    pub failure: PatchFailure,
}

/// Convenience alias for patch replay results.
pub type PatchResult<T> = Result<T, PatchError>;
