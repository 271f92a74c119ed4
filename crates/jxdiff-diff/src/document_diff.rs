//! Document-level diff: one traversal producing both the diff tree and the
//! flat changeset.
//!
//! The walk is driven by an explicit work stack. Every visited location is
//! appended to an arena in pre-order, and flat change records are emitted as
//! locations are visited, so the changeset comes out in traversal order.
//! Once the walk is done the arena is folded bottom-up into the tree.

use jxdiff_types::{
    child_path, ChangeKind, ChangeRecord, DiffOptions, DiffResult, DiffTreeNode, NodeType,
    PatchOperation,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::equality::values_equal;
use crate::lcs::{self, EditKind};
use crate::value::deep_clone;

/// Key given to the root node of a diff tree.
pub const ROOT_KEY: &str = "root";

/// Both outputs of a single comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffOutput {
    /// The flat changeset and patch.
    pub result: DiffResult,
    /// The hierarchical diff tree.
    pub tree: DiffTreeNode,
}

/// Compare two documents, producing the flat changeset and the diff tree.
pub fn compare(left: &Value, right: &Value, options: &DiffOptions) -> DiffOutput {
    let output = Walker::new(options).run(Some(left), Some(right), ROOT_KEY, "");
    let stats = &output.result.stats;
    debug!(
        added = stats.added,
        removed = stats.removed,
        modified = stats.modified,
        unchanged = stats.unchanged,
        patch_ops = output.result.patch.len(),
        "documents compared"
    );
    output
}

/// Compare two documents, producing only the flat changeset.
pub fn diff_documents(left: &Value, right: &Value, options: &DiffOptions) -> DiffResult {
    compare(left, right, options).result
}

/// Build the diff tree of two optional documents with default options.
///
/// The root node has key `"root"` and path `""`.
pub fn build_diff_tree(left: Option<&Value>, right: Option<&Value>) -> DiffTreeNode {
    build_diff_tree_with(left, right, ROOT_KEY, "", &DiffOptions::default())
}

/// Build the diff tree of two optional documents rooted at `key` and `path`.
pub fn build_diff_tree_with(
    left: Option<&Value>,
    right: Option<&Value>,
    key: &str,
    path: &str,
    options: &DiffOptions,
) -> DiffTreeNode {
    Walker::new(options).run(left, right, key, path).tree
}

/// A location waiting to be visited.
struct Frame<'a> {
    left: Option<&'a Value>,
    right: Option<&'a Value>,
    key: String,
    path: String,
    /// Patch address, when it differs from `path`.
    patch_path: Option<String>,
    parent: Option<usize>,
    /// Whether this location contributes records to the flat changeset.
    /// Descendants of unchanged, added or removed nodes only shape the tree.
    emit: bool,
}

impl<'a> Frame<'a> {
    fn child(
        left: Option<&'a Value>,
        right: Option<&'a Value>,
        key: String,
        parent_path: &str,
        parent: usize,
        emit: bool,
    ) -> Self {
        let path = child_path(parent_path, &key);
        Self {
            left,
            right,
            key,
            path,
            patch_path: None,
            parent: Some(parent),
            emit,
        }
    }

    fn with_patch_path(mut self, patch_path: String) -> Self {
        self.patch_path = Some(patch_path);
        self
    }
}

/// Which side of the comparison a one-sided subtree comes from.
#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

pub(crate) struct Walker<'o> {
    options: &'o DiffOptions,
    result: DiffResult,
    nodes: Vec<DiffTreeNode>,
    parents: Vec<Option<usize>>,
    /// Marks modified containers whose final class comes from their children.
    aggregate: Vec<bool>,
}

impl<'o> Walker<'o> {
    pub(crate) fn new(options: &'o DiffOptions) -> Self {
        Self {
            options,
            result: DiffResult::new(),
            nodes: Vec::new(),
            parents: Vec::new(),
            aggregate: Vec::new(),
        }
    }

    pub(crate) fn run(
        mut self,
        left: Option<&Value>,
        right: Option<&Value>,
        key: &str,
        path: &str,
    ) -> DiffOutput {
        let mut stack = vec![Frame {
            left,
            right,
            key: key.to_string(),
            path: path.to_string(),
            patch_path: None,
            parent: None,
            emit: true,
        }];

        while let Some(frame) = stack.pop() {
            let children = self.visit(frame);
            stack.extend(children.into_iter().rev());
        }

        let tree = self.assemble();
        DiffOutput {
            result: self.result,
            tree,
        }
    }

    /// Classify one location, record it, and return its children in order.
    fn visit<'a>(&mut self, frame: Frame<'a>) -> Vec<Frame<'a>> {
        let index = self.nodes.len();
        let Frame {
            left,
            right,
            key,
            path,
            patch_path,
            parent,
            emit,
        } = frame;
        let patch_path = patch_path.unwrap_or_else(|| path.clone());

        let (node, children) = match (left, right) {
            (None, None) => {
                if emit {
                    self.result.push_change(ChangeRecord::unchanged(path.clone()));
                }
                (leaf(key, path, ChangeKind::Unchanged, &Value::Null), Vec::new())
            }
            (Some(l), None) => {
                if emit {
                    self.result
                        .push_change(ChangeRecord::removed(path.clone(), deep_clone(l)));
                    self.result.patch.push(PatchOperation::remove(patch_path));
                }
                let children = one_sided_children(l, Side::Left, &path, index);
                (leaf(key, path, ChangeKind::Removed, l), children)
            }
            (None, Some(r)) => {
                if emit {
                    self.result
                        .push_change(ChangeRecord::added(path.clone(), deep_clone(r)));
                    self.result
                        .patch
                        .push(PatchOperation::add(patch_path, deep_clone(r)));
                }
                let children = one_sided_children(r, Side::Right, &path, index);
                (leaf(key, path, ChangeKind::Added, r), children)
            }
            (Some(l), Some(r)) => {
                if values_equal(l, r, self.options.ignore_type_diff) {
                    if emit {
                        self.result.push_change(ChangeRecord::unchanged(path.clone()));
                    }
                    let children = paired_children(l, r, &path, index);
                    (leaf(key, path, ChangeKind::Unchanged, l), children)
                } else {
                    let children = match (l, r) {
                        (Value::Object(ls), Value::Object(rs)) => {
                            Some(object_children(ls, rs, &path, index, emit))
                        }
                        (Value::Array(ls), Value::Array(rs)) => {
                            Some(self.array_children(ls, rs, &path, index, emit))
                        }
                        _ => None,
                    };
                    // Same-kind containers are described by their children;
                    // only a leaf replacement carries both sides.
                    let (old_value, new_value, node_children) = match &children {
                        Some(_) => (None, None, Some(Vec::new())),
                        None => (Some(deep_clone(l)), Some(deep_clone(r)), None),
                    };
                    if children.is_none() && emit {
                        self.result.push_change(ChangeRecord::modified(
                            path.clone(),
                            deep_clone(l),
                            deep_clone(r),
                        ));
                        self.result
                            .patch
                            .push(PatchOperation::replace(patch_path, deep_clone(r)));
                    }
                    let is_container = children.is_some();
                    let node = DiffTreeNode {
                        key,
                        path,
                        node_type: NodeType::of(r),
                        diff_type: ChangeKind::Modified,
                        value: None,
                        old_value,
                        new_value,
                        children: node_children,
                    };
                    self.aggregate.push(is_container);
                    self.nodes.push(node);
                    self.parents.push(parent);
                    return children.unwrap_or_default();
                }
            }
        };

        self.aggregate.push(false);
        self.nodes.push(node);
        self.parents.push(parent);
        children
    }

    fn array_children<'a>(
        &self,
        ls: &'a [Value],
        rs: &'a [Value],
        path: &str,
        index: usize,
        emit: bool,
    ) -> Vec<Frame<'a>> {
        if self.options.array_order_matters {
            ordered_children(ls, rs, path, index, emit, self.options)
        } else {
            unordered_children(ls, rs, path, index, emit, self.options.ignore_type_diff)
        }
    }

    /// Fold the pre-order arena into a tree.
    ///
    /// Descendants always sit at higher indices than their ancestors, so
    /// draining from the back finishes every child before its parent.
    fn assemble(&mut self) -> DiffTreeNode {
        for index in (1..self.nodes.len()).rev() {
            let node = self.finish(index);
            if let Some(parent) = self.parents[index] {
                self.nodes[parent]
                    .children
                    .get_or_insert_with(Vec::new)
                    .push(node);
            }
        }
        self.finish(0)
    }

    fn finish(&mut self, index: usize) -> DiffTreeNode {
        let mut node = self.nodes.swap_remove(index);
        if let Some(children) = node.children.as_mut() {
            children.reverse();
        }
        if self.aggregate[index] && !node.children().iter().any(|c| c.has_changes()) {
            node.diff_type = ChangeKind::Unchanged;
        }
        node
    }
}

/// Node for a location whose class is decided by one value.
///
/// Containers get an empty child list that is filled during assembly;
/// scalars keep their value.
fn leaf(key: String, path: String, diff_type: ChangeKind, value: &Value) -> DiffTreeNode {
    let node_type = NodeType::of(value);
    let (value, children) = if node_type.is_container() {
        (None, Some(Vec::new()))
    } else {
        (Some(value.clone()), None)
    };
    DiffTreeNode {
        key,
        path,
        node_type,
        diff_type,
        value,
        old_value: None,
        new_value: None,
        children,
    }
}

fn one_sided_children<'a>(value: &'a Value, side: Side, path: &str, index: usize) -> Vec<Frame<'a>> {
    let pair = |v: &'a Value| match side {
        Side::Left => (Some(v), None),
        Side::Right => (None, Some(v)),
    };
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let (l, r) = pair(v);
                Frame::child(l, r, k.clone(), path, index, false)
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let (l, r) = pair(v);
                Frame::child(l, r, i.to_string(), path, index, false)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Children of two values already known to be equal.
fn paired_children<'a>(left: &'a Value, right: &'a Value, path: &str, index: usize) -> Vec<Frame<'a>> {
    match (left, right) {
        (Value::Object(ls), Value::Object(rs)) => ls
            .iter()
            .map(|(k, l)| Frame::child(Some(l), rs.get(k), k.clone(), path, index, false))
            .collect(),
        (Value::Array(ls), Value::Array(rs)) => ls
            .iter()
            .zip(rs)
            .enumerate()
            .map(|(i, (l, r))| Frame::child(Some(l), Some(r), i.to_string(), path, index, false))
            .collect(),
        _ => Vec::new(),
    }
}

/// Left keys in their order, then right-only keys in theirs.
fn object_children<'a>(
    ls: &'a Map<String, Value>,
    rs: &'a Map<String, Value>,
    path: &str,
    index: usize,
    emit: bool,
) -> Vec<Frame<'a>> {
    let mut children: Vec<Frame<'a>> = ls
        .iter()
        .map(|(k, l)| Frame::child(Some(l), rs.get(k), k.clone(), path, index, emit))
        .collect();
    children.extend(
        rs.iter()
            .filter(|(k, _)| !ls.contains_key(k.as_str()))
            .map(|(k, r)| Frame::child(None, Some(r), k.clone(), path, index, emit)),
    );
    children
}

/// Align two arrays with the sequence diff.
///
/// Every element is addressed at its position in the array as it looks when
/// the patch has been replayed up to that element: the left index shifted by
/// a running offset that drops by one per removal and grows by one per
/// addition. For additions and unchanged elements this is the right index.
fn ordered_children<'a>(
    ls: &'a [Value],
    rs: &'a [Value],
    path: &str,
    index: usize,
    emit: bool,
    options: &DiffOptions,
) -> Vec<Frame<'a>> {
    let ignore = options.ignore_type_diff;
    let ops = lcs::diff_with_threshold(
        ls,
        rs,
        |a, b| values_equal(a, b, ignore),
        options.lcs_threshold,
    );

    let mut removed = 0usize;
    let mut added = 0usize;
    let mut children = Vec::with_capacity(ops.len());
    for op in ops {
        let (left, right, position) = match (op.kind, op.left_index, op.right_index) {
            (EditKind::Unchanged, Some(i), Some(j)) => (Some(&ls[i]), Some(&rs[j]), j),
            (EditKind::Added, _, Some(j)) => {
                added += 1;
                (None, Some(op.item), j)
            }
            (EditKind::Removed, Some(i), _) => {
                let position = i + added - removed;
                removed += 1;
                (Some(op.item), None, position)
            }
            _ => continue,
        };
        children.push(Frame::child(left, right, position.to_string(), path, index, emit));
    }
    children
}

/// Match two arrays as multisets.
///
/// Each left element pairs with the first unused equal right element.
/// Unmatched left elements are reported at their left index, with a patch
/// address corrected for the removals before them; unmatched right elements
/// are reported at their right index and appended in the patch.
fn unordered_children<'a>(
    ls: &'a [Value],
    rs: &'a [Value],
    path: &str,
    index: usize,
    emit: bool,
    ignore: bool,
) -> Vec<Frame<'a>> {
    let mut used = vec![false; rs.len()];
    let mut removed = 0usize;
    let mut children = Vec::with_capacity(ls.len() + rs.len());

    for (i, l) in ls.iter().enumerate() {
        let matched = (0..rs.len()).find(|&j| !used[j] && values_equal(l, &rs[j], ignore));
        match matched {
            Some(j) => {
                used[j] = true;
                children.push(Frame::child(Some(l), Some(&rs[j]), i.to_string(), path, index, emit));
            }
            None => {
                let patch_path = child_path(path, &(i - removed).to_string());
                removed += 1;
                children.push(
                    Frame::child(Some(l), None, i.to_string(), path, index, emit)
                        .with_patch_path(patch_path),
                );
            }
        }
    }

    let append = child_path(path, "-");
    for (j, r) in rs.iter().enumerate() {
        if !used[j] {
            children.push(
                Frame::child(None, Some(r), j.to_string(), path, index, emit)
                    .with_patch_path(append.clone()),
            );
        }
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::tests::{chain_depth, dismantle, nest_arrays, nest_objects};
    use serde_json::json;

    fn run(left: &Value, right: &Value, options: &DiffOptions) -> DiffOutput {
        Walker::new(options).run(Some(left), Some(right), "root", "")
    }

    fn paths_of(result: &DiffResult, kind: ChangeKind) -> Vec<&str> {
        result
            .changes
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.path.as_str())
            .collect()
    }

    #[test]
    fn entry_points_agree() {
        let left = json!({"user": {"@_id": "1", "@_name": "John"}, "tags": ["a"]});
        let right = json!({"user": {"@_id": "1", "@_name": "Jane"}, "tags": ["a", "b"]});
        let options = DiffOptions::default();

        let out = compare(&left, &right, &options);
        assert_eq!(diff_documents(&left, &right, &options), out.result);
        assert_eq!(build_diff_tree(Some(&left), Some(&right)), out.tree);
        assert_eq!(out.tree.key, ROOT_KEY);
        assert_eq!(out.tree.path, "");

        let flat: Vec<&str> = out.result.changed().map(|c| c.path.as_str()).collect();
        assert_eq!(flat, vec!["/user/@_name", "/tags/1"]);
        assert_eq!(out.tree.changed_paths(), flat);
    }

    #[test]
    fn subtree_rooted_elsewhere() {
        let options = DiffOptions::default();
        let tree = build_diff_tree_with(
            Some(&json!({"a": 1})),
            Some(&json!({"a": 2})),
            "config",
            "/config",
            &options,
        );
        assert_eq!(tree.key, "config");
        assert_eq!(tree.child("a").unwrap().path, "/config/a");
    }

    #[test]
    fn identical_documents_collapse_to_root() {
        let doc = json!({"a": [1, 2, {"b": null}], "c": "x"});
        let out = run(&doc, &doc.clone(), &DiffOptions::default());
        assert_eq!(out.result.stats.unchanged, 1);
        assert!(out.result.is_identical());
        assert!(out.result.patch.is_empty());
        assert_eq!(out.result.changes[0].path, "");

        // The tree still mirrors the whole document.
        assert_eq!(out.tree.diff_type, ChangeKind::Unchanged);
        assert_eq!(out.tree.node_count(), 7);
    }

    #[test]
    fn object_modify() {
        let out = run(&json!({"x": 1}), &json!({"x": 2}), &DiffOptions::default());
        assert_eq!(out.result.stats.modified, 1);
        assert_eq!(out.result.patch, vec![PatchOperation::replace("/x", json!(2))]);
        let x = out.tree.child("x").unwrap();
        assert_eq!(x.diff_type, ChangeKind::Modified);
        assert_eq!(x.old_value, Some(json!(1)));
        assert_eq!(x.new_value, Some(json!(2)));
        assert_eq!(out.tree.diff_type, ChangeKind::Modified);
    }

    #[test]
    fn object_add_and_remove() {
        let out = run(
            &json!({"x": 1, "y": 2}),
            &json!({"x": 1, "z": {"w": true}}),
            &DiffOptions::default(),
        );
        assert_eq!(out.result.stats.removed, 1);
        assert_eq!(out.result.stats.added, 1);
        assert_eq!(out.result.stats.unchanged, 1);
        assert_eq!(
            out.result.patch,
            vec![
                PatchOperation::remove("/y"),
                PatchOperation::add("/z", json!({"w": true})),
            ]
        );

        // Added containers are built over their own side only.
        let z = out.tree.child("z").unwrap();
        assert_eq!(z.diff_type, ChangeKind::Added);
        assert_eq!(z.children()[0].path, "/z/w");
        assert_eq!(z.children()[0].diff_type, ChangeKind::Added);
    }

    #[test]
    fn key_order_is_left_then_right_only() {
        let left: Value = serde_json::from_str(r#"{"b": 1, "a": 1}"#).unwrap();
        let right: Value = serde_json::from_str(r#"{"d": 1, "a": 2, "c": 1}"#).unwrap();
        let out = run(&left, &right, &DiffOptions::default());
        let paths: Vec<&str> = out.result.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/a", "/d", "/c"]);
        let keys: Vec<&str> = out.tree.children().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn type_mismatch_is_a_leaf_replacement() {
        let out = run(
            &json!({"v": [1, 2]}),
            &json!({"v": {"0": 1}}),
            &DiffOptions::default(),
        );
        assert_eq!(paths_of(&out.result, ChangeKind::Modified), vec!["/v"]);
        let v = out.tree.child("v").unwrap();
        assert!(v.children.is_none());
        assert_eq!(v.node_type, NodeType::Object);
    }

    #[test]
    fn null_versus_object() {
        let out = run(&json!(null), &json!({"a": 1}), &DiffOptions::default());
        assert_eq!(out.result.stats.modified, 1);
        assert_eq!(out.result.patch, vec![PatchOperation::replace("", json!({"a": 1}))]);
    }

    #[test]
    fn ordered_array_replacement() {
        let out = run(&json!([1, 2, 3]), &json!([1, 4, 3]), &DiffOptions::default());
        let kinds: Vec<(ChangeKind, &str)> = out
            .result
            .changes
            .iter()
            .map(|c| (c.kind, c.path.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ChangeKind::Unchanged, "/0"),
                (ChangeKind::Removed, "/1"),
                (ChangeKind::Added, "/1"),
                (ChangeKind::Unchanged, "/2"),
            ]
        );
        assert_eq!(
            out.result.patch,
            vec![PatchOperation::remove("/1"), PatchOperation::add("/1", json!(4))]
        );
    }

    #[test]
    fn consecutive_removals_share_an_address() {
        let out = run(&json!([1, 2, 3, 4]), &json!([4]), &DiffOptions::default());
        assert_eq!(paths_of(&out.result, ChangeKind::Removed), vec!["/0", "/0", "/0"]);
        assert_eq!(paths_of(&out.result, ChangeKind::Unchanged), vec!["/0"]);
    }

    #[test]
    fn removal_after_addition_accounts_for_it() {
        let out = run(&json!([1, 2, 3]), &json!([4, 2, 5]), &DiffOptions::default());
        assert_eq!(
            out.result.patch,
            vec![
                PatchOperation::remove("/0"),
                PatchOperation::add("/0", json!(4)),
                PatchOperation::remove("/2"),
                PatchOperation::add("/2", json!(5)),
            ]
        );
    }

    #[test]
    fn unordered_permutation_is_unchanged() {
        let out = run(&json!([1, 2, 3]), &json!([3, 2, 1]), &DiffOptions::unordered());
        assert_eq!(out.result.stats.unchanged, 3);
        assert_eq!(out.result.stats.added, 0);
        assert_eq!(out.result.stats.removed, 0);
        assert!(out.result.patch.is_empty());
        // Aggregation: nothing below differs.
        assert_eq!(out.tree.diff_type, ChangeKind::Unchanged);
        assert!(out.tree.old_value.is_none());
    }

    #[test]
    fn unordered_patch_addresses() {
        let out = run(
            &json!({"tags": ["a", "b", "c", "d"]}),
            &json!({"tags": ["d", "x", "a"]}),
            &DiffOptions::unordered(),
        );
        assert_eq!(paths_of(&out.result, ChangeKind::Removed), vec!["/tags/1", "/tags/2"]);
        assert_eq!(paths_of(&out.result, ChangeKind::Added), vec!["/tags/1"]);
        assert_eq!(
            out.result.patch,
            vec![
                PatchOperation::remove("/tags/1"),
                PatchOperation::remove("/tags/1"),
                PatchOperation::add("/tags/-", json!("x")),
            ]
        );
    }

    #[test]
    fn ignore_type_diff_treats_loose_primitives_as_equal() {
        let options = DiffOptions {
            ignore_type_diff: true,
            ..Default::default()
        };
        let out = run(&json!({"n": "1", "m": 2}), &json!({"n": 1, "m": "3"}), &options);
        assert_eq!(paths_of(&out.result, ChangeKind::Unchanged), vec!["/n"]);
        assert_eq!(paths_of(&out.result, ChangeKind::Modified), vec!["/m"]);
    }

    #[test]
    fn keys_are_escaped_in_paths() {
        let out = run(&json!({"a/b": 1, "m~n": 1}), &json!({"a/b": 2}), &DiffOptions::default());
        assert_eq!(paths_of(&out.result, ChangeKind::Modified), vec!["/a~1b"]);
        assert_eq!(paths_of(&out.result, ChangeKind::Removed), vec!["/m~0n"]);
        assert_eq!(out.tree.child("a/b").unwrap().path, "/a~1b");
    }

    #[test]
    fn unchanged_children_are_kept_in_tree_but_not_emitted() {
        let out = run(
            &json!({"same": {"deep": [1, 2]}, "x": 1}),
            &json!({"same": {"deep": [1, 2]}, "x": 2}),
            &DiffOptions::default(),
        );
        assert_eq!(out.result.changes.len(), 2);
        let same = out.tree.child("same").unwrap();
        assert_eq!(same.diff_type, ChangeKind::Unchanged);
        assert_eq!(same.children()[0].children().len(), 2);
        assert_eq!(same.children()[0].children()[1].path, "/same/deep/1");
    }

    #[test]
    fn one_sided_roots() {
        let options = DiffOptions::default();
        let doc = json!({"a": [1]});

        let removed = Walker::new(&options).run(Some(&doc), None, "root", "");
        assert_eq!(removed.tree.diff_type, ChangeKind::Removed);
        assert_eq!(removed.tree.children()[0].children()[0].path, "/a/0");
        assert_eq!(removed.result.patch, vec![PatchOperation::remove("")]);

        let added = Walker::new(&options).run(None, Some(&doc), "root", "");
        assert_eq!(added.tree.diff_type, ChangeKind::Added);
        assert_eq!(added.result.stats.added, 1);

        let neither = Walker::new(&options).run(None, None, "root", "");
        assert_eq!(neither.tree.diff_type, ChangeKind::Unchanged);
        assert_eq!(neither.tree.node_type, NodeType::Null);
    }

    /// Follow the `n` children of `node` down to the bottom.
    fn bottom_of(mut node: &DiffTreeNode) -> (&DiffTreeNode, usize) {
        let mut depth = 0;
        while let Some(next) = node.child("n") {
            node = next;
            depth += 1;
        }
        (node, depth)
    }

    /// Take a tree apart level by level, like `dismantle` for values.
    fn dismantle_tree(tree: DiffTreeNode) {
        let mut pending = vec![tree];
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.take().unwrap_or_default());
            for value in [node.value, node.old_value, node.new_value].into_iter().flatten() {
                dismantle(value);
            }
        }
    }

    #[test]
    fn deep_equal_chain_beside_a_change() {
        let chain = nest_objects(1500, "n", json!(1));
        let mut left = Map::new();
        left.insert("deep".into(), deep_clone(&chain));
        left.insert("x".into(), json!(1));
        let mut right = Map::new();
        right.insert("deep".into(), chain);
        right.insert("x".into(), json!(2));
        let (left, right) = (Value::Object(left), Value::Object(right));

        let out = run(&left, &right, &DiffOptions::default());
        assert_eq!(out.result.stats.modified, 1);
        assert_eq!(out.result.stats.unchanged, 1);

        let (bottom, depth) = bottom_of(out.tree.child("deep").unwrap());
        assert_eq!(depth, 1500);
        assert_eq!(bottom.path.len(), "/deep".len() + "/n".len() * 1500);

        dismantle_tree(out.tree);
        dismantle(left);
        dismantle(right);
    }

    #[test]
    fn change_at_the_bottom_of_a_deep_document() {
        let left = nest_objects(1500, "n", json!(1));
        let right = nest_objects(1500, "n", json!(2));
        let out = run(&left, &right, &DiffOptions::default());

        let leaf_path = "/n".repeat(1500);
        assert_eq!(out.result.stats.modified, 1);
        assert_eq!(out.result.changes.len(), 1);
        assert_eq!(out.result.changes[0].path, leaf_path);
        assert_eq!(out.result.changes[0].old_value, Some(json!(1)));
        assert_eq!(out.result.patch, vec![PatchOperation::replace(leaf_path.clone(), json!(2))]);

        assert_eq!(out.tree.diff_type, ChangeKind::Modified);
        assert!(out.tree.old_value.is_none());
        assert!(out.tree.new_value.is_none());
        assert_eq!(out.tree.changed_paths(), vec![leaf_path.as_str()]);
        let (bottom, depth) = bottom_of(&out.tree);
        assert_eq!(depth, 1500);
        assert_eq!(bottom.diff_type, ChangeKind::Modified);
        assert_eq!(bottom.new_value, Some(json!(2)));

        dismantle_tree(out.tree);
        dismantle(left);
        dismantle(right);
    }

    #[test]
    fn deep_subtree_added_under_a_key() {
        let left = json!({"keep": true});
        let mut right = Map::new();
        right.insert("keep".into(), json!(true));
        right.insert("deep".into(), nest_arrays(1500, json!("x")));
        let right = Value::Object(right);

        let mut out = run(&left, &right, &DiffOptions::default());
        assert_eq!(out.result.stats.added, 1);
        let added = out.result.changes.pop().unwrap();
        assert_eq!(added.path, "/deep");
        let value = added.new_value.unwrap();
        assert_eq!(chain_depth(&value), 1500);

        dismantle(value);
        for op in out.result.patch.drain(..) {
            if let PatchOperation::Add { value, .. } = op {
                dismantle(value);
            }
        }
        dismantle_tree(out.tree);
        dismantle(right);
    }

    #[test]
    fn ordered_removals_keep_their_patch_address_in_the_tree() {
        let out = run(&json!([1, 2, 3, 4]), &json!([4]), &DiffOptions::default());
        let children: Vec<(&str, &str, ChangeKind)> = out
            .tree
            .children()
            .iter()
            .map(|c| (c.key.as_str(), c.path.as_str(), c.diff_type))
            .collect();
        assert_eq!(
            children,
            vec![
                ("0", "/0", ChangeKind::Removed),
                ("0", "/0", ChangeKind::Removed),
                ("0", "/0", ChangeKind::Removed),
                ("0", "/0", ChangeKind::Unchanged),
            ]
        );
        let removed: Vec<&Value> = out
            .tree
            .children()
            .iter()
            .filter_map(|c| c.value.as_ref())
            .collect();
        assert_eq!(removed, vec![&json!(1), &json!(2), &json!(3), &json!(4)]);
    }
}
