//! Annotation types for markup drawn on document pages
//!
//! Coordinates are page-local pixels as drawn at the record's creation zoom.
//! They are never normalized; rendering rescales them by
//! `render_zoom / creation_zoom`.

use serde::{Deserialize, Serialize};

use super::geometry::{self, DisplayRect, Segment};
use crate::config::MarkColor;

fn default_creation_zoom() -> f32 {
    1.0
}

/// Translucent filled rectangle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightAnnotation {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: MarkColor,
    /// Fill opacity (0-255)
    pub alpha: u8,
    /// Zoom level in effect when the highlight was drawn
    #[serde(default = "default_creation_zoom")]
    pub creation_zoom: f32,
}

/// Opaque stroked segment with round caps
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineAnnotation {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: MarkColor,
    /// Stroke width at creation zoom, at least 1
    pub width: u32,
    #[serde(default = "default_creation_zoom")]
    pub creation_zoom: f32,
}

/// Unified annotation type, drawn in insertion order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Highlight(HighlightAnnotation),
    Line(LineAnnotation),
}

/// Why a record cannot be stored
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidAnnotation {
    #[error("creation zoom {0} must be finite and positive")]
    CreationZoom(f32),
    #[error("coordinates must be finite")]
    Coordinates,
    #[error("line width must be at least 1")]
    LineWidth,
}

impl Annotation {
    /// Check the record can be rescaled, drawn and hit-tested
    pub fn validate(&self) -> Result<(), InvalidAnnotation> {
        let zoom = self.creation_zoom();
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(InvalidAnnotation::CreationZoom(zoom));
        }
        let (x1, y1, x2, y2) = match self {
            Annotation::Highlight(h) => (h.x1, h.y1, h.x2, h.y2),
            Annotation::Line(l) => (l.x1, l.y1, l.x2, l.y2),
        };
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(InvalidAnnotation::Coordinates);
        }
        if let Annotation::Line(l) = self
            && l.width == 0
        {
            return Err(InvalidAnnotation::LineWidth);
        }
        Ok(())
    }

    pub fn creation_zoom(&self) -> f32 {
        match self {
            Annotation::Highlight(h) => h.creation_zoom,
            Annotation::Line(l) => l.creation_zoom,
        }
    }

    /// Factor mapping stored coordinates to `render_zoom`
    pub fn scale_at(&self, render_zoom: f32) -> f32 {
        geometry::scale_factor(render_zoom, self.creation_zoom())
    }
}

impl HighlightAnnotation {
    /// Rectangle in display coordinates at `render_zoom`
    pub fn display_rect(&self, render_zoom: f32) -> DisplayRect {
        let scale = geometry::scale_factor(render_zoom, self.creation_zoom);
        DisplayRect::new(self.x1, self.y1, self.x2, self.y2).scaled(scale)
    }
}

impl LineAnnotation {
    /// Segment in display coordinates at `render_zoom`
    pub fn display_segment(&self, render_zoom: f32) -> Segment {
        let scale = geometry::scale_factor(render_zoom, self.creation_zoom);
        Segment::new(self.x1, self.y1, self.x2, self.y2).scaled(scale)
    }

    /// Stroke width at `render_zoom`, never thinner than one device pixel
    pub fn display_width(&self, render_zoom: f32) -> f32 {
        let scale = geometry::scale_factor(render_zoom, self.creation_zoom);
        geometry::scaled_stroke_width(self.width, scale)
    }
}

/// Page-scoped identity assigned when a record is first stored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

/// An annotation as held by the store, tagged with its identity
#[derive(Clone, Debug, PartialEq)]
pub struct StoredAnnotation {
    pub id: AnnotationId,
    pub annotation: Annotation,
}
