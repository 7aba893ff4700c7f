//! # History
//!
//! Snapshot-based undo/redo over whole documents.
//!
//! ## Design
//!
//! - Every commit pushes a clone of the previous `present` onto `past`
//! - Committing a document structurally equal to `present` is a no-op
//! - New commits clear `future`
//! - `replace_history` installs a document as the new baseline; it is not an
//!   undoable edit and also becomes the saved snapshot
//! - Dirty state compares `present` with the saved snapshot by value
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(doc);
//! history.commit(edited);
//! assert!(history.is_dirty());
//!
//! history.undo();
//! assert!(!history.is_dirty());
//! ```

use mailforge_schema::Document;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Default number of undo levels kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Reset past/future instead of recording an undo step
    pub replace_history: bool,
}

/// Derived from `present` vs the saved snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone)]
pub struct History {
    /// Previous states, oldest first
    past: VecDeque<Document>,

    present: Document,

    /// Undone states, next redo first
    future: VecDeque<Document>,

    saved: Document,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Start from `initial`, treating it as already saved
    pub fn new(initial: Document) -> Self {
        Self::with_max_levels(initial, DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(initial: Document, max_levels: usize) -> Self {
        Self {
            past: VecDeque::new(),
            saved: initial.clone(),
            present: initial,
            future: VecDeque::new(),
            max_levels,
        }
    }

    pub fn present(&self) -> &Document {
        &self.present
    }

    /// Record `doc` as the next state. Returns whether anything changed.
    pub fn commit(&mut self, doc: Document) -> bool {
        self.commit_with(doc, CommitOptions::default())
    }

    pub fn commit_with(&mut self, doc: Document, options: CommitOptions) -> bool {
        if options.replace_history {
            debug!("history replaced");
            self.past.clear();
            self.future.clear();
            self.saved = doc.clone();
            self.present = doc;
            return true;
        }

        if doc == self.present {
            debug!("commit skipped: document unchanged");
            return false;
        }

        let previous = std::mem::replace(&mut self.present, doc);
        self.past.push_back(previous);
        if self.max_levels > 0 && self.past.len() > self.max_levels {
            self.past.pop_front();
        }
        self.future.clear();
        debug!(undo_levels = self.past.len(), "history commit");
        true
    }

    /// Step back one commit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        debug!(undo_levels = self.past.len(), redo_levels = self.future.len(), "undo");
        true
    }

    /// Re-apply the most recently undone commit
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        debug!(undo_levels = self.past.len(), redo_levels = self.future.len(), "redo");
        true
    }

    /// Mark `present` as persisted.
    ///
    /// Returns the snapshot to hand to the persistence collaborator, or
    /// `None` when already clean.
    pub fn save(&mut self) -> Option<&Document> {
        if !self.is_dirty() {
            return None;
        }
        self.saved = self.present.clone();
        info!("document saved");
        Some(&self.saved)
    }

    pub fn save_state(&self) -> SaveState {
        if self.present == self.saved {
            SaveState::Clean
        } else {
            SaveState::Dirty
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.save_state() == SaveState::Dirty
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }
}
