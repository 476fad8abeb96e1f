//! Annotation rendering module
//!
//! This module contains:
//! - Geometry helpers shared between drawing and gesture handling
//! - Page compositing using tiny-skia
//! - PNG export of composited pages

pub mod export;
pub mod geometry;
pub mod image;

pub use self::image::render_page;
