//! Undo/redo over whole-document snapshots.

use crate::document::{Document, EditAction};
use crate::widgets::WidgetRegistry;

/// Default maximum number of undo states to keep.
pub const DEFAULT_UNDO_LIMIT: usize = 20;

/// How the history records edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Maximum number of undo states to keep.
    pub limit: usize,
    /// Whether selection-only moves get their own undo step.
    pub track_selection: bool,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_UNDO_LIMIT,
            track_selection: true,
        }
    }
}

/// Past, present and future documents.
///
/// Every tracked edit pushes the present onto `past` and clears `future`,
/// even one that leaves the document unchanged, so an undo always reverts
/// exactly the last edit. Selection moves are the only untracked edits, and
/// only when `track_selection` is off.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: Vec<Document>,
    present: Document,
    future: Vec<Document>,
    options: HistoryOptions,
}

impl History {
    /// Start a history at `document` with no undo trail.
    pub fn new(document: Document) -> Self {
        Self::with_options(document, HistoryOptions::default())
    }

    pub fn with_options(document: Document, options: HistoryOptions) -> Self {
        Self {
            past: Vec::new(),
            present: document,
            future: Vec::new(),
            options,
        }
    }

    /// The current document.
    pub fn present(&self) -> &Document {
        &self.present
    }

    pub fn options(&self) -> HistoryOptions {
        self.options
    }

    /// Apply an edit. Returns true if the document changed.
    pub fn apply(&mut self, action: EditAction, registry: &WidgetRegistry) -> bool {
        let untracked = action.is_selection_only() && !self.options.track_selection;
        let name = action.name();

        let before = self.present.clone();
        self.present.apply(action, registry);
        let changed = self.present != before;

        if untracked {
            log::debug!("Applied {} (not recorded)", name);
        } else {
            log::debug!("Applied {}", name);
            self.past.push(before);
            self.future.clear();
            if self.past.len() > self.options.limit {
                self.past.remove(0);
            }
        }
        changed
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(previous) = self.past.pop() {
            let current = std::mem::replace(&mut self.present, previous);
            self.future.push(current);
            true
        } else {
            false
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(next) = self.future.pop() {
            let current = std::mem::replace(&mut self.present, next);
            self.past.push(current);
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Replace the present document and drop both stacks.
    pub fn reset(&mut self, document: Document) {
        self.past.clear();
        self.future.clear();
        self.present = document;
    }
}
