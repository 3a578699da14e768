//! Linear undo/redo history over full-document snapshots.

use crate::elements::Element;
use serde::{Deserialize, Serialize};

/// A snapshot of the element sequence at one point in edit history.
/// Snapshots own deep copies so later store mutation cannot corrupt them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All elements at the time of the snapshot.
    pub elements: Vec<Element>,
}

impl Snapshot {
    /// Capture a snapshot from an element slice.
    pub fn capture(elements: &[Element]) -> Self {
        Self {
            elements: elements.to_vec(),
        }
    }
}

/// Single-branch undo/redo timeline.
///
/// The history is one flat snapshot list; `index` points at the snapshot
/// currently displayed. Pushing after an undo truncates the abandoned
/// redo branch, so there is only ever one active timeline.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: usize,
}

impl History {
    /// Create a history seeded with the initial document state.
    pub fn new(seed: Snapshot) -> Self {
        Self {
            snapshots: vec![seed],
            index: 0,
        }
    }

    /// Record a new snapshot after a committed mutation. Discards any
    /// snapshots past the current index (the redo branch).
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. No-op at the initial snapshot.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one snapshot. No-op at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 == self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Number of snapshots currently held (always at least the seed).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}
