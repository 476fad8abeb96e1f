//! Decoded page image at the fixed base render scale

use std::sync::Arc;

use image::{Rgba, RgbaImage};

/// An immutable, opaque page raster
///
/// Cloning is cheap; the pixel buffer is shared and never mutated. All zoom
/// scaling happens on copies produced by the compositor.
#[derive(Clone, Debug)]
pub struct PageRaster {
    rgba: Arc<RgbaImage>,
}

impl PageRaster {
    /// Wrap a decoded image, flattening any transparency onto white
    pub fn new(mut rgba: RgbaImage) -> Self {
        if rgba.pixels().any(|p| p[3] != u8::MAX) {
            flatten_onto_white(&mut rgba);
        }
        log::debug!("PageRaster decoded: {}x{} pixels", rgba.width(), rgba.height());
        Self {
            rgba: Arc::new(rgba),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

fn flatten_onto_white(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        let a = pixel[3] as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        *pixel = Rgba([blend(pixel[0]), blend(pixel[1]), blend(pixel[2]), u8::MAX]);
    }
}
