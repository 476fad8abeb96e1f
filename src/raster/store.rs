//! Holds the page rasters of the currently loaded document

use crate::error::{PagemarkError, Result};

use super::decoder::PageDecoder;
use super::page::PageRaster;

/// One immutable raster per page, replaced wholesale on document load
#[derive(Clone, Debug, Default)]
pub struct RasterStore {
    pages: Vec<PageRaster>,
}

impl RasterStore {
    fn new(pages: Vec<PageRaster>) -> Self {
        Self { pages }
    }

    /// Decode `bytes` into a fresh store
    ///
    /// A document without pages is treated as malformed.
    pub fn load(decoder: &dyn PageDecoder, bytes: &[u8], scale: f32) -> Result<Self> {
        let pages = decoder.decode(bytes, scale)?;
        if pages.is_empty() {
            return Err(PagemarkError::Decode("document has no pages".to_owned()));
        }
        log::info!("Decoded document: {} page(s) at scale {}", pages.len(), scale);
        Ok(Self::new(pages))
    }

    pub fn get(&self, page: usize) -> Result<&PageRaster> {
        self.pages.get(page).ok_or(PagemarkError::OutOfRange {
            page,
            page_count: self.pages.len(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
