//! Error type shared by the raster, annotation, and export layers

use thiserror::Error;

use crate::domain::InvalidAnnotation;

/// Errors surfaced by the annotation and compositing engine
#[derive(Debug, Error)]
pub enum PagemarkError {
    /// Document bytes could not be decoded into page rasters
    #[error("failed to decode document: {0}")]
    Decode(String),
    /// The rendering backend needed for this document is not available
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid annotation: {0}")]
    InvalidAnnotation(#[from] InvalidAnnotation),
    #[error("page {page} out of range (page_count={page_count})")]
    OutOfRange { page: usize, page_count: usize },
    /// Undo or redo requested with nothing recorded
    #[error("nothing to undo")]
    EmptyLog,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

pub type Result<T, E = PagemarkError> = std::result::Result<T, E>;
