//! Document-wide undo/redo log for annotation edits
//!
//! Entries describe a single record added to or removed from a page. Undo
//! applies the inverse, redo replays the edit. Both stacks span every page and
//! are discarded when a new document loads.

use crate::domain::StoredAnnotation;
use crate::error::{PagemarkError, Result};

use super::store::AnnotationStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    /// The record was added; undoing removes it
    WasAdded,
    /// The record was erased or cleared; undoing re-adds it on top
    WasRemoved,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UndoEntry {
    pub page: usize,
    pub record: StoredAnnotation,
    pub kind: EditKind,
}

impl UndoEntry {
    /// Apply the inverse of this edit to `store`
    ///
    /// Returns false if a removal found nothing to remove.
    pub fn revert(&self, store: &mut AnnotationStore) -> bool {
        match self.kind {
            EditKind::WasAdded => store.remove(self.page, self.record.id).is_some(),
            EditKind::WasRemoved => {
                store.restore(self.page, self.record.clone());
                true
            }
        }
    }

    /// Apply this edit to `store` again
    pub fn reapply(&self, store: &mut AnnotationStore) -> bool {
        match self.kind {
            EditKind::WasAdded => {
                store.restore(self.page, self.record.clone());
                true
            }
            EditKind::WasRemoved => store.remove(self.page, self.record.id).is_some(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UndoLog {
    undo: Vec<UndoEntry>,
    redo: Vec<UndoEntry>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit; any redo history is dropped
    pub fn push(&mut self, page: usize, record: StoredAnnotation, kind: EditKind) {
        self.redo.clear();
        self.undo.push(UndoEntry { page, record, kind });
    }

    /// Pop the latest edit and hand it to `apply` for reversal
    pub fn pop_and_apply(&mut self, apply: impl FnOnce(&UndoEntry)) -> Result<UndoEntry> {
        let entry = self.undo.pop().ok_or(PagemarkError::EmptyLog)?;
        apply(&entry);
        self.redo.push(entry.clone());
        Ok(entry)
    }

    /// Pop the latest undone edit and hand it to `apply` for replay
    pub fn redo_and_apply(&mut self, apply: impl FnOnce(&UndoEntry)) -> Result<UndoEntry> {
        let entry = self.redo.pop().ok_or(PagemarkError::EmptyLog)?;
        apply(&entry);
        self.undo.push(entry.clone());
        Ok(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
