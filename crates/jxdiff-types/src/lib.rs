//! Foundation types for the jxdiff structural diff engine.
//!
//! This crate provides the value-level data model shared by the engine, the
//! exporters and the worker boundary. Every other jxdiff crate depends on
//! `jxdiff-types`.
//!
//! # Key Types
//!
//! - [`ChangeRecord`] / [`ChangeKind`] -- One entry of the flat changeset
//! - [`DiffStats`] / [`DiffResult`] -- Flat changeset with counters and patch
//! - [`PatchOperation`] -- RFC 6902 edit instruction
//! - [`DiffTreeNode`] / [`NodeType`] -- Hierarchical, change-annotated tree
//! - [`DiffOptions`] -- Comparison switches shared by every entry point
//!
//! Documents are plain [`serde_json::Value`]s (built with `preserve_order`),
//! re-exported here as [`Document`]. XML inputs are expected to be converted
//! to the same model, with attributes stored as synthetic keys.

pub mod change;
pub mod error;
pub mod options;
pub mod patch;
pub mod pointer;
pub mod tree;

pub use change::{ChangeKind, ChangeRecord, DiffResult, DiffStats};
pub use error::PointerError;
pub use options::{DiffOptions, DEFAULT_LCS_THRESHOLD};
pub use patch::PatchOperation;
pub use pointer::{child_path, escape_segment, parse_pointer, unescape_segment};
pub use tree::{DiffTreeNode, NodeType};

/// A parsed JSON or XML document.
pub type Document = serde_json::Value;
