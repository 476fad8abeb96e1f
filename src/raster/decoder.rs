//! Document decoding backends
//!
//! A document is decoded exactly once, at a fixed base scale, into one
//! [`PageRaster`] per page. PDF rendering needs the optional `pdfium` feature
//! and a loadable pdfium library; plain raster images always decode through
//! the `image` crate as a single page.

use crate::error::{PagemarkError, Result};

use super::page::PageRaster;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Turns raw document bytes into page rasters
pub trait PageDecoder: Send + Sync {
    /// Decode every page at `scale`
    fn decode(&self, bytes: &[u8], scale: f32) -> Result<Vec<PageRaster>>;
}

/// Decoder for single-page raster documents (PNG, JPEG, ...)
///
/// Raster input is already in pixels, so `scale` is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

impl PageDecoder for ImageDecoder {
    fn decode(&self, bytes: &[u8], _scale: f32) -> Result<Vec<PageRaster>> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| PagemarkError::Decode(e.to_string()))?;
        Ok(vec![PageRaster::new(img.to_rgba8())])
    }
}

/// Check whether bytes look like a PDF document
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

#[cfg(feature = "pdfium")]
fn pdf_backend() -> Result<Box<dyn PageDecoder>> {
    Ok(Box::new(pdfium_backend::PdfiumDecoder::from_system_library()?))
}

#[cfg(not(feature = "pdfium"))]
fn pdf_backend() -> Result<Box<dyn PageDecoder>> {
    Err(PagemarkError::UnsupportedFormat(
        "PDF rendering requires the `pdfium` feature".to_owned(),
    ))
}

/// Dispatches on content: PDFs to the pdfium backend, everything else to
/// [`ImageDecoder`]
///
/// The PDF backend is bound once at construction; when it is unavailable
/// PDF input fails with `UnsupportedFormat` while images still decode.
pub struct AutoDecoder {
    images: ImageDecoder,
    pdf: std::result::Result<Box<dyn PageDecoder>, String>,
}

impl AutoDecoder {
    pub fn new() -> Self {
        let pdf = pdf_backend().map_err(|e| e.to_string());
        if let Err(reason) = &pdf {
            log::warn!("PDF backend unavailable: {}", reason);
        }
        Self {
            images: ImageDecoder,
            pdf,
        }
    }

    /// Result of the backend probe made in [`AutoDecoder::new`]
    pub fn supports_pdf(&self) -> bool {
        self.pdf.is_ok()
    }
}

impl Default for AutoDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDecoder for AutoDecoder {
    fn decode(&self, bytes: &[u8], scale: f32) -> Result<Vec<PageRaster>> {
        if !is_pdf(bytes) {
            return self.images.decode(bytes, scale);
        }
        match &self.pdf {
            Ok(backend) => backend.decode(bytes, scale),
            Err(reason) => Err(PagemarkError::UnsupportedFormat(reason.clone())),
        }
    }
}

#[cfg(feature = "pdfium")]
pub mod pdfium_backend {
    use super::*;
    use image::RgbaImage;
    use pdfium_render::prelude::*;

    /// Renders PDF pages through a bound pdfium library
    pub struct PdfiumDecoder {
        pdfium: Pdfium,
    }

    impl PdfiumDecoder {
        /// Bind pdfium from the working directory or the system library path
        pub fn from_system_library() -> Result<Self> {
            let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "./",
            ))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| {
                PagemarkError::UnsupportedFormat(format!("failed to bind pdfium library: {e}"))
            })?;
            Ok(Self {
                pdfium: Pdfium::new(bindings),
            })
        }
    }

    impl PageDecoder for PdfiumDecoder {
        fn decode(&self, bytes: &[u8], scale: f32) -> Result<Vec<PageRaster>> {
            let document = self
                .pdfium
                .load_pdf_from_byte_slice(bytes, None)
                .map_err(|e| PagemarkError::Decode(e.to_string()))?;
            let config = PdfRenderConfig::new().scale_page_by_factor(scale);

            let mut pages = Vec::with_capacity(document.pages().len() as usize);
            for (index, page) in document.pages().iter().enumerate() {
                let bitmap = page
                    .render_with_config(&config)
                    .map_err(|e| PagemarkError::Decode(format!("page {index}: {e}")))?;
                let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
                let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec())
                    .ok_or_else(|| {
                        PagemarkError::Decode(format!("page {index}: bitmap size mismatch"))
                    })?;
                pages.push(PageRaster::new(rgba));
            }
            Ok(pages)
        }
    }
}
