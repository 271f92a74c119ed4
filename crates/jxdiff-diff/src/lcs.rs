//! Sequence diff: minimal edit script between two ordered sequences.
//!
//! Sequences up to the threshold are aligned with the classic dynamic
//! programming LCS table. Longer sequences fall back to a linear index-wise
//! comparison so memory stays bounded.

use jxdiff_types::DEFAULT_LCS_THRESHOLD;
use tracing::debug;

/// Kind of a single edit step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    Unchanged,
    Added,
    Removed,
}

/// One step of an edit script.
///
/// `left_index` is `None` for additions and `right_index` is `None` for
/// removals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditOp<'a, T> {
    pub kind: EditKind,
    pub item: &'a T,
    pub left_index: Option<usize>,
    pub right_index: Option<usize>,
}

impl<'a, T> EditOp<'a, T> {
    fn unchanged(item: &'a T, left: usize, right: usize) -> Self {
        Self {
            kind: EditKind::Unchanged,
            item,
            left_index: Some(left),
            right_index: Some(right),
        }
    }

    fn added(item: &'a T, right: usize) -> Self {
        Self {
            kind: EditKind::Added,
            item,
            left_index: None,
            right_index: Some(right),
        }
    }

    fn removed(item: &'a T, left: usize) -> Self {
        Self {
            kind: EditKind::Removed,
            item,
            left_index: Some(left),
            right_index: None,
        }
    }
}

/// Compute the edit script turning `left` into `right` using the default
/// threshold.
pub fn diff<'a, T, F>(left: &'a [T], right: &'a [T], equals: F) -> Vec<EditOp<'a, T>>
where
    F: Fn(&T, &T) -> bool,
{
    diff_with_threshold(left, right, equals, DEFAULT_LCS_THRESHOLD)
}

/// Compute the edit script turning `left` into `right`.
///
/// When both lengths are within `threshold` the script is a true LCS
/// alignment. On ties the backtrack steps over an addition before a removal,
/// so in forward order removals precede additions within a replaced run.
pub fn diff_with_threshold<'a, T, F>(
    left: &'a [T],
    right: &'a [T],
    equals: F,
    threshold: usize,
) -> Vec<EditOp<'a, T>>
where
    F: Fn(&T, &T) -> bool,
{
    if left.is_empty() {
        return right
            .iter()
            .enumerate()
            .map(|(j, item)| EditOp::added(item, j))
            .collect();
    }
    if right.is_empty() {
        return left
            .iter()
            .enumerate()
            .map(|(i, item)| EditOp::removed(item, i))
            .collect();
    }

    if left.len() == right.len() && left.iter().zip(right).all(|(a, b)| equals(a, b)) {
        return left
            .iter()
            .enumerate()
            .map(|(i, item)| EditOp::unchanged(item, i, i))
            .collect();
    }

    if left.len().max(right.len()) > threshold {
        debug!(
            left = left.len(),
            right = right.len(),
            threshold,
            "sequence exceeds LCS threshold, using linear comparison"
        );
        return linear_diff(left, right, &equals);
    }

    table_diff(left, right, &equals)
}

fn table_diff<'a, T, F>(left: &'a [T], right: &'a [T], equals: &F) -> Vec<EditOp<'a, T>>
where
    F: Fn(&T, &T) -> bool,
{
    // A shared suffix is exactly what the backtrack would match first, so
    // peel it off to keep the table small.
    let mut suffix = 0;
    while suffix < left.len()
        && suffix < right.len()
        && equals(&left[left.len() - 1 - suffix], &right[right.len() - 1 - suffix])
    {
        suffix += 1;
    }
    let n = left.len() - suffix;
    let m = right.len() - suffix;

    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in 1..=n {
        for j in 1..=m {
            table[i * width + j] = if equals(&left[i - 1], &right[j - 1]) {
                table[(i - 1) * width + (j - 1)] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + (j - 1)])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m + suffix);
    for k in (0..suffix).rev() {
        ops.push(EditOp::unchanged(&left[n + k], n + k, m + k));
    }

    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && equals(&left[i - 1], &right[j - 1]) {
            ops.push(EditOp::unchanged(&left[i - 1], i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i * width + (j - 1)] >= table[(i - 1) * width + j]) {
            ops.push(EditOp::added(&right[j - 1], j - 1));
            j -= 1;
        } else {
            ops.push(EditOp::removed(&left[i - 1], i - 1));
            i -= 1;
        }
    }

    ops.reverse();
    ops
}

fn linear_diff<'a, T, F>(left: &'a [T], right: &'a [T], equals: &F) -> Vec<EditOp<'a, T>>
where
    F: Fn(&T, &T) -> bool,
{
    let shared = left.len().min(right.len());
    let mut ops = Vec::with_capacity(left.len().max(right.len()) + shared);

    for i in 0..shared {
        if equals(&left[i], &right[i]) {
            ops.push(EditOp::unchanged(&left[i], i, i));
        } else {
            ops.push(EditOp::removed(&left[i], i));
            ops.push(EditOp::added(&right[i], i));
        }
    }
    for (i, item) in left.iter().enumerate().skip(shared) {
        ops.push(EditOp::removed(item, i));
    }
    for (j, item) in right.iter().enumerate().skip(shared) {
        ops.push(EditOp::added(item, j));
    }

    ops
}
