//! Sublayers and symbolizer bindings for tiled vector layers.
//!
//! # Scope
//!
//! This crate implements:
//! - **Sublayers**
//!   - Id and class derivation from layer names
//!   - Feature and binding ownership in insertion order
//!   - Visibility, ordering index and origin paint order
//!   - Destroy semantics: every later call is an illegal state
//!
//! - **Symbolizer bindings**
//!   - Whole-sublayer and single-feature modes
//!   - CartoCSS rules or server styles as the base style source
//!   - Highlight overlays from the layer's highlight index
//!   - Surface rebinding before every draw
//!
//! - **Backends**
//!   - The draw contract and a recording display list
//!
//! # Not Implemented
//!
//! - Rasterization; backends receive resolved styles, not pixels
//! - Hit testing and tile scheduling

/// Drawing backend contract and a recording backend.
pub mod backend;
/// Tile features.
pub mod feature;
/// Layer highlight state.
pub mod highlight;
/// Layer-level collaborators of a render pass.
pub mod layer;
/// Sublayers.
pub mod sublayer;
/// Symbolizer bindings.
pub mod symbolizer;

pub use backend::{DisplayList, DrawBackend, DrawCommand, SurfaceHandles, SurfaceId};
pub use feature::{Feature, Geometry, RenderClass};
pub use highlight::{HighlightContext, HighlightInfo};
pub use layer::{FixedZoom, LayerContext, MapView, RenderPass};
pub use sublayer::{OriginIndex, Sublayer, SublayerOptions, TileKey, UgcLayerType};
pub use symbolizer::{BindingMode, BindingState, StyleSource, SublayerTarget, SymbolizerBinding};
