//! Pure domain types with minimal dependencies
//!
//! Types here carry no rendering or runtime dependencies so the store,
//! compositor, and session can all share them.

pub mod annotation;
pub mod geometry;

pub use annotation::*;
pub use geometry::*;
