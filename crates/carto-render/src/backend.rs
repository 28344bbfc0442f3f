//! Drawing backend contract and a recording implementation.
//!
//! Pixels are out of scope: a backend receives one `draw_feature` call per
//! feature with the resolved style. Several bindings may share one backend;
//! each binding rebinds its own surfaces right before it draws.

use carto_style::{CanonicalStyle, FeatureId, GeometryKind};
use serde::Serialize;

use crate::feature::{Feature, RenderClass};

/// Handle of a drawing surface owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u32);

/// The surfaces a binding draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceHandles {
    /// Visible surface.
    pub context: SurfaceId,
    /// Hit-testing surface.
    pub hit_context: SurfaceId,
}

impl SurfaceHandles {
    /// Handles for a pair of surfaces.
    #[must_use]
    pub const fn new(context: u32, hit_context: u32) -> Self {
        Self {
            context: SurfaceId(context),
            hit_context: SurfaceId(hit_context),
        }
    }
}

/// Receiver of resolved draw calls.
///
/// Implementations must accept every canonical property of a feature's
/// geometry kind and ignore properties they do not know.
pub trait DrawBackend {
    /// Make `handles` the active surfaces for subsequent draws.
    fn bind_surfaces(&mut self, handles: SurfaceHandles);

    /// Draw one feature with its resolved style.
    fn draw_feature(&mut self, feature: &Feature, style: &CanonicalStyle);
}

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum DrawCommand {
    /// Surfaces were rebound.
    BindSurfaces {
        /// The new active surfaces.
        handles: SurfaceHandles,
    },

    /// A feature was drawn.
    DrawFeature {
        /// Feature id.
        #[serde(rename = "featureId")]
        feature_id: FeatureId,
        /// Geometry kind.
        kind: GeometryKind,
        /// Whether the highlight overlay was applied.
        #[serde(rename = "highlight")]
        highlighted: bool,
        /// Paint-order tiebreak.
        #[serde(rename = "layerIndex")]
        layer_index: Option<u32>,
        /// Surfaces active at the time of the draw.
        surfaces: Option<SurfaceHandles>,
        /// Resolved style.
        style: CanonicalStyle,
    },
}

/// A backend that records every call in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    #[serde(skip)]
    active: Option<SurfaceHandles>,
}

impl DisplayList {
    /// An empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
            active: None,
        }
    }

    /// Recorded commands, oldest first.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Recorded draws only, oldest first.
    pub fn draws(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::DrawFeature { .. }))
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.active = None;
    }
}

impl DrawBackend for DisplayList {
    fn bind_surfaces(&mut self, handles: SurfaceHandles) {
        self.active = Some(handles);
        self.commands.push(DrawCommand::BindSurfaces { handles });
    }

    fn draw_feature(&mut self, feature: &Feature, style: &CanonicalStyle) {
        self.commands.push(DrawCommand::DrawFeature {
            feature_id: feature.id,
            kind: feature.kind(),
            highlighted: feature.render_class == RenderClass::Highlight,
            layer_index: feature.layer_index,
            surfaces: self.active,
            style: style.clone(),
        });
    }
}
