//! Canonical drawing-style property names.
//!
//! These are the names the drawing backend understands. Their string forms
//! follow the 2D canvas vocabulary (`fillStyle`, `lineWidth`, ...).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A canonical style property consumed by the drawing backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum CanvasProperty {
    /// Composite font descriptor (`"<size>px/<gap>px <family>"`).
    Font,
    /// Height of a text block in pixels.
    TextHeight,
    /// Horizontal text alignment.
    TextAlign,
    /// Vertical text alignment.
    TextBaseline,
    /// Halo width around text.
    HaloRadius,
    /// Text halo / background color.
    BackColor,
    /// Text fill color.
    ForeColor,
    /// Marker image reference.
    PointFile,
    /// Marker radius.
    PointRadius,
    /// Marker halo width.
    PointHaloRadius,
    /// Marker halo color.
    PointHaloColor,
    /// Marker size from server styles.
    MarkerSize,
    /// Fill color or pattern.
    FillStyle,
    /// Stroke color.
    StrokeStyle,
    /// Stroke width.
    LineWidth,
    /// Stroke end cap.
    LineCap,
    /// Stroke corner join.
    LineJoin,
    /// Miter length limit.
    MiterLimit,
    /// Dash phase.
    LineDashOffset,
    /// Dash pattern.
    LineDasharray,
    /// Perpendicular line offset.
    Offset,
    /// Outline opacity of polygons.
    LineOpacity,
    /// Fill opacity of polygons.
    PolygonOpacity,
    /// Horizontal displacement.
    OffsetX,
    /// Vertical displacement.
    OffsetY,
    /// Overall opacity.
    GlobalAlpha,
    /// Blend mode.
    GlobalCompositeOperation,
}
