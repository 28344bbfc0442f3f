//! Vector features as delivered in a tile.

use carto_style::{Attributes, CanonicalStyle, FeatureId, GeometryKind, TextStyle};
use serde::Deserialize;
use strum_macros::Display;

/// How a feature was classified by the last render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RenderClass {
    /// Drawn with its base style.
    #[default]
    Normal,
    /// Drawn with a highlight overlay.
    Highlight,
}

/// Geometry of a feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    /// Geometry kind; selects the style tables.
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    /// Vertices in tile pixel space.
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
    /// Label text of a TEXT geometry.
    #[serde(default)]
    pub text: Option<String>,
    /// Server text style of a TEXT geometry.
    #[serde(default)]
    pub text_style: Option<TextStyle>,
}

impl Geometry {
    /// A geometry of `kind` over `coordinates`.
    #[must_use]
    pub const fn new(kind: GeometryKind, coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            kind,
            coordinates,
            text: None,
            text_style: None,
        }
    }
}

/// A feature of a sublayer.
///
/// `render_class` and `layer_index` are written by each render pass. The
/// cached `style` is only ever read by the render pass; highlight overlays
/// produce a separate record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    /// Identity within the tile.
    pub id: FeatureId,
    /// Geometry.
    pub geometry: Geometry,
    /// Attribute values.
    #[serde(default)]
    pub attributes: Attributes,
    /// Style resolved ahead of time, if any.
    #[serde(skip)]
    pub style: Option<CanonicalStyle>,
    /// Classification from the last render pass.
    #[serde(skip)]
    pub render_class: RenderClass,
    /// Paint-order tiebreak stamped by the last render pass.
    #[serde(skip)]
    pub layer_index: Option<u32>,
}

impl Feature {
    /// A feature without attributes.
    #[must_use]
    pub fn new(id: i64, geometry: Geometry) -> Self {
        Self {
            id: FeatureId(id),
            geometry,
            attributes: Attributes::new(),
            style: None,
            render_class: RenderClass::Normal,
            layer_index: None,
        }
    }

    /// Builder form setting the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder form setting the cached style.
    #[must_use]
    pub fn with_style(mut self, style: CanonicalStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Geometry kind.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        self.geometry.kind
    }
}
