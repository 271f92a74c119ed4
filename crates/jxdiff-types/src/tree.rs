//! Hierarchical diff tree.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::change::ChangeKind;

/// Type tag of a document value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeType {
    /// Tag of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns `true` for objects and arrays.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the diff tree.
///
/// Scalars carry `value`. A modified node without children, a scalar change
/// or a change of type, carries `old_value` and `new_value` instead.
/// Containers carry `children` and no values of their own; a container's
/// `diff_type` is `modified` iff at least one child is not `unchanged`.
///
/// A child's `path` is its parent's path followed by `/` and the escaped
/// `key`. Under an ordered array the key is the element's position in the
/// partially patched array, the same address the patch uses: additions and
/// unchanged elements sit at their right index, removals at the shifted left
/// index. Siblings may therefore share a key, as in `[1, 2, 3, 4]` against
/// `[4]` where all four children are at `/0`; their order in `children` is
/// the edit order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffTreeNode {
    pub key: String,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub diff_type: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DiffTreeNode>>,
}

impl DiffTreeNode {
    /// Children of this node, empty for leaves.
    pub fn children(&self) -> &[DiffTreeNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Find the first child with the given key.
    pub fn child(&self, key: &str) -> Option<&DiffTreeNode> {
        self.children().iter().find(|c| c.key == key)
    }

    /// Returns `true` if this node or any descendant differs.
    pub fn has_changes(&self) -> bool {
        self.diff_type.is_change()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// Paths of the outermost changed locations, in pre-order.
    ///
    /// An added or removed subtree contributes its own path only; a modified
    /// container contributes the paths of its changed descendants; a modified
    /// leaf contributes its own path. This is the same set of locations the
    /// flat changeset reports as non-`unchanged`.
    pub fn changed_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node.diff_type {
                ChangeKind::Unchanged => {}
                ChangeKind::Added | ChangeKind::Removed => paths.push(node.path.as_str()),
                ChangeKind::Modified => match &node.children {
                    Some(children) if !children.is_empty() => {
                        stack.extend(children.iter().rev());
                    }
                    _ => paths.push(node.path.as_str()),
                },
            }
        }
        paths
    }
}
