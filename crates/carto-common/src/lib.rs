//! Common utilities for the carto symbolizer.
//!
//! This crate provides shared infrastructure used by the style and render crates:
//! - **Errors** - the render-pass error taxonomy
//! - **Warning System** - deduplicated, colored terminal output for defaulted input
//! - **URLs** - query-string building for the symbol image endpoint
//! - **Images** - RGBA bitmaps backing pattern fills

pub mod error;
pub mod image;
pub mod url;
pub mod warning;
