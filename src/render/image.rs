//! Page compositing using tiny-skia
//!
//! The base raster is resized to the display zoom, annotations are drawn onto
//! a transparent overlay in Z-order, and the overlay is blended over the page
//! with source-over. The result is flattened to opaque RGB.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform};

use super::geometry;
use crate::domain::{Annotation, HighlightAnnotation, LineAnnotation, StoredAnnotation};
use crate::raster::PageRaster;

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
///
/// Only valid for opaque images, where straight and premultiplied alpha agree.
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

/// Display size for a page of `width` x `height` at `zoom`
pub fn display_size(width: u32, height: u32, zoom: f32) -> (u32, u32) {
    let scale = |v: u32| (v as f32 * zoom).round().max(1.0) as u32;
    (scale(width), scale(height))
}

/// Resize a page raster to `zoom` with Lanczos resampling
///
/// Works on a copy; the stored raster is never touched.
pub fn resize_to_zoom(page: &PageRaster, zoom: f32) -> RgbaImage {
    let (w, h) = display_size(page.width(), page.height(), zoom);
    if (w, h) == (page.width(), page.height()) {
        return page.image().clone();
    }
    imageops::resize(page.image(), w, h, FilterType::Lanczos3)
}

/// Fill a highlight rectangle with its color at the stored alpha
fn draw_highlight(pixmap: &mut Pixmap, highlight: &HighlightAnnotation, render_zoom: f32) {
    let rect = highlight.display_rect(render_zoom);
    let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(rect.x1, rect.y1, rect.x2, rect.y2);
    let Some(rect) = tiny_skia::Rect::from_ltrb(min_x, min_y, max_x, max_y) else {
        return;
    };

    let [r, g, b, a] = highlight.color.to_rgba_u8(highlight.alpha);
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = false;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Stroke an opaque line with round caps at the zoom-scaled width
fn draw_line(pixmap: &mut Pixmap, line: &LineAnnotation, render_zoom: f32) {
    let segment = line.display_segment(render_zoom);

    let mut pb = PathBuilder::new();
    pb.move_to(segment.x1, segment.y1);
    pb.line_to(segment.x2, segment.y2);
    let Some(path) = pb.finish() else {
        return;
    };

    let [r, g, b, a] = line.color.to_rgba_u8(u8::MAX);
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: line.display_width(render_zoom),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// Draw every annotation onto `overlay` in Z-order
pub fn draw_annotations_in_order(
    overlay: &mut Pixmap,
    annotations: &[StoredAnnotation],
    render_zoom: f32,
) {
    for stored in annotations {
        match &stored.annotation {
            Annotation::Highlight(highlight) => draw_highlight(overlay, highlight, render_zoom),
            Annotation::Line(line) => draw_line(overlay, line, render_zoom),
        }
    }
}

/// Drop the alpha channel of an opaque image
pub fn flatten(img: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(img).to_rgb8()
}

/// Composite a page at `render_zoom` with its annotations
///
/// Pages without annotations skip the overlay pass entirely.
pub fn render_page(
    page: &PageRaster,
    render_zoom: f32,
    annotations: &[StoredAnnotation],
) -> RgbImage {
    let mut base = resize_to_zoom(page, render_zoom);
    if annotations.is_empty() {
        return flatten(base);
    }

    let Some(mut overlay) = Pixmap::new(base.width(), base.height()) else {
        return flatten(base);
    };
    draw_annotations_in_order(&mut overlay, annotations, render_zoom);
    log::debug!(
        "Composited {} annotation(s) at zoom {} onto {}x{}",
        annotations.len(),
        render_zoom,
        base.width(),
        base.height()
    );

    with_pixmap(&mut base, |pixmap| {
        pixmap.draw_pixmap(
            0,
            0,
            overlay.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    });
    flatten(base)
}
