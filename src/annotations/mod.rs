//! Annotation records, hit-testing, undo history, and edit handlers
//!
//! This module provides:
//! - Per-page annotation storage keyed by stable ids
//! - Eraser hit-testing in display coordinates
//! - The document-wide undo log
//! - Message handlers for EditMsg

pub mod handlers;
pub mod history;
pub mod store;

pub use history::{EditKind, UndoEntry, UndoLog};
pub use store::AnnotationStore;
