//! Per-page annotation lists
//!
//! Insertion order is Z-order: later entries draw on top and win hit-tests.
//! Records are keyed by an [`AnnotationId`] that increases monotonically per
//! page, so two visually identical strokes are still told apart on removal.

use std::collections::HashMap;

use crate::domain::{Annotation, AnnotationId, StoredAnnotation};

use super::hit_test;

#[derive(Clone, Debug, Default)]
struct PageAnnotations {
    items: Vec<StoredAnnotation>,
    next_id: u64,
}

/// Annotation lists for every page of the current document
///
/// A page that was never touched has an implicitly empty list.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    pages: HashMap<usize, PageAnnotations>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new annotation, assigning it the next id for that page
    pub fn add(&mut self, page: usize, annotation: Annotation) -> StoredAnnotation {
        let entry = self.pages.entry(page).or_default();
        let stored = StoredAnnotation {
            id: AnnotationId(entry.next_id),
            annotation,
        };
        entry.next_id += 1;
        entry.items.push(stored.clone());
        stored
    }

    /// Re-append a previously stored record, keeping its id
    ///
    /// The record becomes the topmost annotation on the page.
    pub fn restore(&mut self, page: usize, record: StoredAnnotation) {
        let entry = self.pages.entry(page).or_default();
        entry.next_id = entry.next_id.max(record.id.0 + 1);
        entry.items.push(record);
    }

    /// Remove the record with `id`, returning it if it was present
    pub fn remove(&mut self, page: usize, id: AnnotationId) -> Option<StoredAnnotation> {
        let entry = self.pages.get_mut(&page)?;
        let index = entry.items.iter().position(|a| a.id == id)?;
        Some(entry.items.remove(index))
    }

    /// Empty a page, returning its previous contents in Z-order
    pub fn clear(&mut self, page: usize) -> Vec<StoredAnnotation> {
        self.pages
            .get_mut(&page)
            .map(|entry| std::mem::take(&mut entry.items))
            .unwrap_or_default()
    }

    /// Annotations on a page in Z-order
    pub fn list(&self, page: usize) -> &[StoredAnnotation] {
        self.pages
            .get(&page)
            .map(|entry| entry.items.as_slice())
            .unwrap_or_default()
    }

    /// Topmost annotation under a display-space point at `render_zoom`
    pub fn find_at(
        &self,
        page: usize,
        x: f32,
        y: f32,
        render_zoom: f32,
        threshold: f32,
    ) -> Option<&StoredAnnotation> {
        hit_test::find(self.list(page), x, y, render_zoom, threshold)
    }

    /// Total number of annotations across all pages
    pub fn len(&self) -> usize {
        self.pages.values().map(|entry| entry.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard every page's annotations (new document)
    pub fn reset(&mut self) {
        self.pages.clear();
    }
}
