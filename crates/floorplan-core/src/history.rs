//! Bounded undo/redo history of immutable snapshots.

use std::collections::VecDeque;

/// Default number of past snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo/redo history.
///
/// `present` is the snapshot currently shown; `past` holds older snapshots
/// (oldest first) and `future` holds undone snapshots (next redo first).
/// Stored snapshots are only ever handed out by shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    past: VecDeque<T>,
    present: Option<T>,
    future: VecDeque<T>,
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> History<T> {
    /// Create an empty history keeping at most `limit` past snapshots.
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: None,
            future: VecDeque::new(),
            limit,
        }
    }

    /// Record a new snapshot.
    ///
    /// The current present moves to the end of `past`, dropping the oldest
    /// entry if the limit is exceeded. Any redo branch is discarded.
    pub fn push(&mut self, snapshot: T) {
        if let Some(present) = self.present.take() {
            self.past.push_back(present);
            while self.past.len() > self.limit {
                self.past.pop_front();
            }
        }
        self.present = Some(snapshot);
        self.future.clear();
    }

    /// Step back one snapshot.
    /// Returns false (and changes nothing) if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        if let Some(present) = self.present.replace(previous) {
            self.future.push_front(present);
        }
        true
    }

    /// Step forward one snapshot.
    /// Returns false (and changes nothing) if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        if let Some(present) = self.present.replace(next) {
            self.past.push_back(present);
        }
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn present(&self) -> Option<&T> {
        self.present.as_ref()
    }

    /// Past snapshots, oldest first.
    pub fn past(&self) -> impl ExactSizeIterator<Item = &T> {
        self.past.iter()
    }

    /// Undone snapshots, next redo first.
    pub fn future(&self) -> impl ExactSizeIterator<Item = &T> {
        self.future.iter()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
