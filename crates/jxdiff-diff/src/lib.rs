//! Structural diff engine for JSON and XML documents.
//!
//! Compares two document values and produces a flat changeset with an
//! RFC 6902 patch, a change-annotated diff tree, or both from one traversal.
//! Traversal and equality use explicit work stacks, so arbitrarily deep
//! documents are handled without exhausting the call stack.
//!
//! # Key Types
//!
//! - [`compare`] / [`DiffOutput`] -- Flat changeset and diff tree in one pass
//! - [`diff_documents`] / [`build_diff_tree`] -- Either output on its own
//! - [`lcs::diff`] / [`EditOp`] -- Sequence alignment used for ordered arrays
//! - [`apply_patch`] / [`PatchError`] -- Replay of RFC 6902 patches
//! - [`ChangeCursor`] -- Next/previous navigation over changes
//! - [`deep_clone`] -- Stack-safe copy of a document value

pub mod cursor;
pub mod document_diff;
pub mod equality;
pub mod error;
pub mod lcs;
pub mod patch_apply;
pub mod value;

pub use cursor::ChangeCursor;
pub use document_diff::{
    build_diff_tree, build_diff_tree_with, compare, diff_documents, DiffOutput, ROOT_KEY,
};
pub use equality::values_equal;
pub use error::{PatchError, PatchFailure, PatchResult};
pub use lcs::{EditKind, EditOp};
pub use patch_apply::{apply_patch, apply_patch_to};
pub use value::deep_clone;
