//! Highlight and line markup over paginated documents
//!
//! Pages are decoded once into opaque rasters. Annotations are stored in the
//! coordinates they were drawn in, together with the zoom in effect at the
//! time, and are rescaled whenever a page is composited at another zoom.

pub mod annotations;
pub mod config;
pub mod domain;
pub mod error;
pub mod markup;
pub mod raster;
pub mod render;
pub mod session;

pub use config::{MarkColor, PagemarkConfig};
pub use domain::{Annotation, AnnotationId, HighlightAnnotation, LineAnnotation, StoredAnnotation};
pub use error::{PagemarkError, Result};
pub use session::Session;
