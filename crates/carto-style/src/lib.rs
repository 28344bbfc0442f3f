//! Style maps and style resolution for the carto symbolizer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style maps**
//!   - CartoCSS property tables per geometry kind
//!   - Mapnik to canvas composite operation table
//!   - Default canonical style per geometry kind
//!   - Server style attribute metadata (canvas target, kind, unit, default)
//!
//! - **Style resolution**
//!   - Shader rules to a partial canonical style, with font synthesis
//!   - Defaulting of partial styles
//!   - Server styles to canonical styles (marker URLs, fonts, unit
//!     conversion, fill patterns, dash presets)
//!   - Highlight overlays as copy-on-write merges
//!
//! # Not Implemented
//!
//! - CartoCSS parsing and rule matching; shaders arrive pre-built
//! - Gradient fills and marker rotation from server styles

/// The canonical style record.
pub mod canonical;
/// Canvas colors and service colors.
pub mod color;
/// Geometry kinds and feature ids.
pub mod geometry;
/// Canonical property names.
pub mod property;
/// Style resolution functions.
pub mod resolver;
/// Server style schema and attribute metadata.
pub mod server_style;
/// Shader rules and value evaluators.
pub mod shader;
/// Process-wide lookup tables.
pub mod style_maps;
/// Physical unit conversion.
pub mod units;
/// Canonical style values.
pub mod value;

pub use canonical::CanonicalStyle;
pub use color::{ColorValue, ServerColor};
pub use geometry::{FeatureId, GeometryKind};
pub use property::CanvasProperty;
pub use resolver::{
    FillImages, ServerStyleContext, ServerStyleSource, overlay_highlight, resolve_carto_style,
    resolve_defaults, resolve_from_rules, resolve_from_server_style,
};
pub use server_style::{ServerStyle, TextStyle};
pub use shader::{Attributes, FEATURE_ID_ATTRIBUTE, Shader, ShaderRule, ValueEvaluator};
pub use style_maps::StyleMaps;
pub use value::{FillPattern, StyleValue};
