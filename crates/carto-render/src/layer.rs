//! Collaborators owned by the enclosing tile layer.

use carto_style::{FillImages, ServerStyleContext};

use crate::backend::DrawBackend;
use crate::highlight::HighlightContext;

/// Viewport state read at the start of every render.
pub trait MapView {
    /// Current zoom level.
    fn zoom(&self) -> f64;
}

/// A viewport fixed at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedZoom(pub f64);

impl MapView for FixedZoom {
    fn zoom(&self) -> f64 {
        self.0
    }
}

/// Layer-level state shared by every sublayer of a tile layer.
#[derive(Debug, Clone, Default)]
pub struct LayerContext {
    /// Base URL of the layer service.
    pub url: String,
    /// Preloaded fill symbol bitmaps.
    pub fill_images: FillImages,
    /// Highlight index and shaders.
    pub highlight: HighlightContext,
}

impl LayerContext {
    /// A layer served from `url`, without fill images or highlight.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Inputs for server style resolution.
    #[must_use]
    pub fn server_context(&self) -> ServerStyleContext<'_> {
        ServerStyleContext {
            layer_url: &self.url,
            fill_images: &self.fill_images,
        }
    }
}

/// Everything a render pass reads or writes besides the sublayer itself.
pub struct RenderPass<'a> {
    /// The owning layer.
    pub layer: &'a LayerContext,
    /// The viewport.
    pub map: &'a dyn MapView,
    /// The shared drawing backend.
    pub backend: &'a mut dyn DrawBackend,
}

impl<'a> RenderPass<'a> {
    /// Assemble a pass.
    #[must_use]
    pub fn new(
        layer: &'a LayerContext,
        map: &'a dyn MapView,
        backend: &'a mut dyn DrawBackend,
    ) -> Self {
        Self {
            layer,
            map,
            backend,
        }
    }
}
