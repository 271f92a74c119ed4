//! Flat changeset: change records, counters and the resulting patch.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::patch::PatchOperation;

/// Classification of a single location in a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present only on the right side.
    Added,
    /// Present only on the left side.
    Removed,
    /// Present on both sides with different content.
    Modified,
    /// Present on both sides with equal content.
    Unchanged,
}

impl ChangeKind {
    /// Lowercase name, as used in serialized output and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Unchanged => "unchanged",
        }
    }

    /// Returns `true` for every kind except [`ChangeKind::Unchanged`].
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the flat changeset.
///
/// `added` carries only `new_value`, `removed` only `old_value`, `modified`
/// both, and `unchanged` neither.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// JSON Pointer of the location, `""` for the root.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl ChangeRecord {
    pub fn added(path: impl Into<String>, value: Value) -> Self {
        Self {
            kind: ChangeKind::Added,
            path: path.into(),
            old_value: None,
            new_value: Some(value),
        }
    }

    pub fn removed(path: impl Into<String>, value: Value) -> Self {
        Self {
            kind: ChangeKind::Removed,
            path: path.into(),
            old_value: Some(value),
            new_value: None,
        }
    }

    pub fn modified(path: impl Into<String>, old: Value, new: Value) -> Self {
        Self {
            kind: ChangeKind::Modified,
            path: path.into(),
            old_value: Some(old),
            new_value: Some(new),
        }
    }

    pub fn unchanged(path: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Unchanged,
            path: path.into(),
            old_value: None,
            new_value: None,
        }
    }
}

/// Per-kind counters over a changeset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffStats {
    /// Increment the counter for `kind`.
    pub fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Added => self.added += 1,
            ChangeKind::Removed => self.removed += 1,
            ChangeKind::Modified => self.modified += 1,
            ChangeKind::Unchanged => self.unchanged += 1,
        }
    }

    /// Counter for `kind`.
    pub fn count(&self, kind: ChangeKind) -> usize {
        match kind {
            ChangeKind::Added => self.added,
            ChangeKind::Removed => self.removed,
            ChangeKind::Modified => self.modified,
            ChangeKind::Unchanged => self.unchanged,
        }
    }

    /// Number of records that are not `unchanged`.
    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

/// The flat result of comparing two documents.
///
/// `stats` always agrees with `changes`, and `patch` replays left into right
/// when applied strictly in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub changes: Vec<ChangeRecord>,
    pub stats: DiffStats,
    pub patch: Vec<PatchOperation>,
}

impl DiffResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change record, keeping `stats` in sync.
    pub fn push_change(&mut self, change: ChangeRecord) {
        self.stats.record(change.kind);
        self.changes.push(change);
    }

    /// Returns `true` if nothing was added, removed or modified.
    pub fn is_identical(&self) -> bool {
        self.stats.total_changes() == 0
    }

    /// Iterate over the records that are not `unchanged`.
    pub fn changed(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.changes.iter().filter(|c| c.kind.is_change())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_change_updates_stats() {
        let mut result = DiffResult::new();
        result.push_change(ChangeRecord::added("/a", json!(1)));
        result.push_change(ChangeRecord::removed("/b", json!(2)));
        result.push_change(ChangeRecord::unchanged("/c"));
        result.push_change(ChangeRecord::unchanged("/d"));

        assert_eq!(result.stats.added, 1);
        assert_eq!(result.stats.removed, 1);
        assert_eq!(result.stats.modified, 0);
        assert_eq!(result.stats.unchanged, 2);
        assert_eq!(result.stats.total_changes(), 2);
        assert_eq!(result.changed().count(), 2);
        assert!(!result.is_identical());
    }

    #[test]
    fn record_serializes_camel_case() {
        let change = ChangeRecord::modified("/x", json!(1), json!(2));
        let v = serde_json::to_value(&change).unwrap();
        assert_eq!(
            v,
            json!({"type": "modified", "path": "/x", "oldValue": 1, "newValue": 2})
        );
    }

    #[test]
    fn unchanged_omits_values() {
        let v = serde_json::to_value(ChangeRecord::unchanged("")).unwrap();
        assert_eq!(v, json!({"type": "unchanged", "path": ""}));
    }

    #[test]
    fn kind_display() {
        assert_eq!(ChangeKind::Removed.to_string(), "removed");
        assert!(ChangeKind::Added.is_change());
        assert!(!ChangeKind::Unchanged.is_change());
    }

    #[test]
    fn result_roundtrip() {
        let mut result = DiffResult::new();
        result.push_change(ChangeRecord::added("/y", json!({"z": [1, 2]})));
        result.patch.push(PatchOperation::add("/y", json!({"z": [1, 2]})));
        let text = serde_json::to_string(&result).unwrap();
        let parsed: DiffResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
    }
}
