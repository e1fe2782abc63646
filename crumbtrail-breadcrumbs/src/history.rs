// SPDX-License-Identifier: LGPL-3.0-only
//! Snapshots of trail state and the bounded undo/redo stack built on them.

use crate::item::BreadcrumbItem;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Copy of the trail state at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The trail items.
    pub items: Vec<BreadcrumbItem>,
    /// Whether the trail was expanded.
    pub expanded: bool,
    /// When the snapshot was taken.
    pub timestamp: SystemTime,
    /// State version at capture time.
    pub version: u64,
}

/// Linear undo/redo stack.
///
/// Pushing after an undo drops the entries that could have been redone.
/// When full, the oldest entry is evicted.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    max_len: usize,
}

impl History {
    /// Create an empty history holding at most `max_len` entries (minimum 1).
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_len: max_len.max(1),
        }
    }

    /// Record a new entry after the cursor.
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        while self.entries.len() > self.max_len {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back. Returns the entry to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward. Returns the entry to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// Whether [`History::undo`] would move.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`History::redo`] would move.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The entry at the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Change the capacity.
    ///
    /// Entries older than the cursor are evicted first; if that is not enough,
    /// redo entries are dropped from the newest end. The entry at the cursor
    /// always survives.
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len.max(1);
        let overflow = self.entries.len().saturating_sub(self.max_len);
        let older = overflow.min(self.cursor);
        self.entries.drain(..older);
        self.cursor -= older;
        self.entries.truncate(self.max_len);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
