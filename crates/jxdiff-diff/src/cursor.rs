//! Stepping through the changes of a diff result.

use jxdiff_types::{ChangeRecord, DiffResult};

/// Cursor over the non-`unchanged` records of a [`DiffResult`].
///
/// The cursor starts before the first change and wraps around at both ends,
/// so repeatedly stepping in one direction cycles through every change.
#[derive(Clone, Debug)]
pub struct ChangeCursor<'r> {
    changes: Vec<&'r ChangeRecord>,
    position: Option<usize>,
}

impl<'r> ChangeCursor<'r> {
    pub fn new(result: &'r DiffResult) -> Self {
        Self {
            changes: result.changed().collect(),
            position: None,
        }
    }

    /// Number of changes the cursor steps through.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Index of the current change, `None` before the first step.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// The change under the cursor.
    pub fn current(&self) -> Option<&'r ChangeRecord> {
        self.position.map(|i| self.changes[i])
    }

    /// Step forward and return the path of the new current change.
    pub fn next_change(&mut self) -> Option<&'r str> {
        if self.changes.is_empty() {
            return None;
        }
        let next = match self.position {
            Some(i) => (i + 1) % self.changes.len(),
            None => 0,
        };
        self.position = Some(next);
        Some(self.changes[next].path.as_str())
    }

    /// Step backward and return the path of the new current change.
    ///
    /// From the initial position this lands on the last change.
    pub fn prev_change(&mut self) -> Option<&'r str> {
        if self.changes.is_empty() {
            return None;
        }
        let prev = match self.position {
            Some(i) if i > 0 => i - 1,
            _ => self.changes.len() - 1,
        };
        self.position = Some(prev);
        Some(self.changes[prev].path.as_str())
    }

    /// Return to the position before the first change.
    pub fn reset(&mut self) {
        self.position = None;
    }
}
