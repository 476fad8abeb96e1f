//! Page raster decoding and storage
//!
//! This module consolidates:
//! - The immutable page image type (page.rs)
//! - Decoding backends for raster images and PDFs (decoder.rs)
//! - The per-document raster store (store.rs)

pub mod decoder;
pub mod page;
pub mod store;

pub use decoder::{AutoDecoder, ImageDecoder, PageDecoder};
pub use page::PageRaster;
pub use store::RasterStore;
