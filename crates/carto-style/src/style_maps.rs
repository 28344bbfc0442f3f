//! Process-wide style lookup tables.
//!
//! The tables are built once on first use and are read-only afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::canonical::CanonicalStyle;
use crate::color::ColorValue;
use crate::geometry::GeometryKind;
use crate::property::CanvasProperty;
use crate::value::StyleValue;

/// Where a CartoCSS property lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartoTarget {
    /// Directly onto a canonical property.
    Canvas(CanvasProperty),
    /// Font size; combined with the font name into `font`.
    FontSize,
    /// Font family; combined with the font size into `font`.
    FontName,
}

/// Fill used by untyped point styles.
const POINT_FILL: ColorValue = ColorValue::rgb(255, 204, 0);
/// Halo around untyped point markers.
const POINT_HALO: ColorValue = ColorValue::rgb(204, 51, 51);
/// Fill used by untyped regions.
const REGION_FILL: ColorValue = ColorValue::rgb(128, 128, 128);

const TEXT_PROPERTIES: &[(&str, CartoTarget)] = &[
    ("text-size", CartoTarget::FontSize),
    ("text-face-name", CartoTarget::FontName),
    ("text-align", CartoTarget::Canvas(CanvasProperty::TextAlign)),
    (
        "text-vertical-alignment",
        CartoTarget::Canvas(CanvasProperty::TextBaseline),
    ),
    ("text-halo-radius", CartoTarget::Canvas(CanvasProperty::HaloRadius)),
    ("text-halo-color", CartoTarget::Canvas(CanvasProperty::BackColor)),
    ("text-fill", CartoTarget::Canvas(CanvasProperty::ForeColor)),
    ("text-opacity", CartoTarget::Canvas(CanvasProperty::GlobalAlpha)),
    ("text-dx", CartoTarget::Canvas(CanvasProperty::OffsetX)),
    ("text-dy", CartoTarget::Canvas(CanvasProperty::OffsetY)),
    (
        "text-comp-op",
        CartoTarget::Canvas(CanvasProperty::GlobalCompositeOperation),
    ),
];

const POINT_PROPERTIES: &[(&str, CanvasProperty)] = &[
    ("point-file", CanvasProperty::PointFile),
    ("point-fill", CanvasProperty::FillStyle),
    ("point-radius", CanvasProperty::PointRadius),
    ("point-halo-radius", CanvasProperty::PointHaloRadius),
    ("point-halo-color", CanvasProperty::PointHaloColor),
    ("point-dx", CanvasProperty::OffsetX),
    ("point-dy", CanvasProperty::OffsetY),
    ("point-opacity", CanvasProperty::GlobalAlpha),
    ("point-comp-op", CanvasProperty::GlobalCompositeOperation),
];

const LINE_PROPERTIES: &[(&str, CanvasProperty)] = &[
    ("line-color", CanvasProperty::StrokeStyle),
    ("line-width", CanvasProperty::LineWidth),
    ("line-cap", CanvasProperty::LineCap),
    ("line-join", CanvasProperty::LineJoin),
    ("line-miterlimit", CanvasProperty::MiterLimit),
    ("line-dash-offset", CanvasProperty::LineDashOffset),
    ("line-opacity", CanvasProperty::GlobalAlpha),
    ("line-dasharray", CanvasProperty::LineDasharray),
    ("line-offset", CanvasProperty::Offset),
    ("line-comp-op", CanvasProperty::GlobalCompositeOperation),
];

const REGION_PROPERTIES: &[(&str, CanvasProperty)] = &[
    ("line-color", CanvasProperty::StrokeStyle),
    ("line-width", CanvasProperty::LineWidth),
    ("line-cap", CanvasProperty::LineCap),
    ("line-join", CanvasProperty::LineJoin),
    ("line-miterlimit", CanvasProperty::MiterLimit),
    ("line-dash-offset", CanvasProperty::LineDashOffset),
    ("line-opacity", CanvasProperty::LineOpacity),
    ("line-dasharray", CanvasProperty::LineDasharray),
    ("polygon-fill", CanvasProperty::FillStyle),
    ("polygon-dx", CanvasProperty::OffsetX),
    ("polygon-dy", CanvasProperty::OffsetY),
    ("polygon-opacity", CanvasProperty::PolygonOpacity),
    ("polygon-comp-op", CanvasProperty::GlobalCompositeOperation),
];

/// Mapnik composite operations with a canvas equivalent. Every other
/// operation leaves the composite mode untouched.
const COMPOSITE_OPERATIONS: &[(&str, &str)] = &[
    ("src-over", "source-over"),
    ("dst-over", "destination-over"),
    ("src-in", "source-in"),
    ("dst-in", "destination-in"),
    ("src-out", "source-out"),
    ("dst-out", "destination-out"),
    ("src-atop", "source-atop"),
    ("dst-atop", "destination-atop"),
    ("xor", "xor"),
    ("plus", "lighter"),
    ("lighten", "lighter"),
];

/// The read-only style tables.
#[derive(Debug)]
pub struct StyleMaps {
    carto: HashMap<GeometryKind, HashMap<&'static str, CartoTarget>>,
    composite: HashMap<&'static str, &'static str>,
    defaults: HashMap<GeometryKind, CanonicalStyle>,
}

static STYLE_MAPS: LazyLock<StyleMaps> = LazyLock::new(StyleMaps::build);

impl StyleMaps {
    /// The shared tables.
    #[must_use]
    pub fn global() -> &'static Self {
        &STYLE_MAPS
    }

    fn build() -> Self {
        let canvas = |table: &[(&'static str, CanvasProperty)]| {
            table
                .iter()
                .map(|&(name, property)| (name, CartoTarget::Canvas(property)))
                .collect::<HashMap<_, _>>()
        };
        let carto = HashMap::from([
            (GeometryKind::Text, TEXT_PROPERTIES.iter().copied().collect()),
            (GeometryKind::Point, canvas(POINT_PROPERTIES)),
            (GeometryKind::Line, canvas(LINE_PROPERTIES)),
            (GeometryKind::Region, canvas(REGION_PROPERTIES)),
        ]);
        let defaults = [
            GeometryKind::Point,
            GeometryKind::Line,
            GeometryKind::Region,
            GeometryKind::Text,
        ]
        .into_iter()
        .map(|kind| (kind, default_table(kind)))
        .collect();

        Self {
            carto,
            composite: COMPOSITE_OPERATIONS.iter().copied().collect(),
            defaults,
        }
    }

    /// Target of a CartoCSS property for `kind`, `None` when unmapped.
    #[must_use]
    pub fn carto_target(&self, kind: GeometryKind, property: &str) -> Option<CartoTarget> {
        self.carto.get(&kind)?.get(property).copied()
    }

    /// Every CartoCSS property mapped for `kind`, with its target.
    pub fn carto_properties(
        &self,
        kind: GeometryKind,
    ) -> impl Iterator<Item = (&'static str, CartoTarget)> {
        self.carto
            .get(&kind)
            .into_iter()
            .flat_map(|table| table.iter().map(|(name, target)| (*name, *target)))
    }

    /// Canvas composite operation for a Mapnik operation name.
    ///
    /// `None` means "no override": the caller keeps whatever mode it had.
    #[must_use]
    pub fn composite_operation(&self, name: &str) -> Option<&'static str> {
        self.composite.get(name).copied()
    }

    /// Complete default style for `kind`.
    #[must_use]
    pub fn default_style(&self, kind: GeometryKind) -> &CanonicalStyle {
        // every kind is populated in `build`
        &self.defaults[&kind]
    }
}

fn default_table(kind: GeometryKind) -> CanonicalStyle {
    use CanvasProperty as P;

    let base = CanonicalStyle::new().with(P::GlobalCompositeOperation, "source-over");
    match kind {
        GeometryKind::Point => base
            .with(P::PointFile, "")
            .with(P::FillStyle, POINT_FILL)
            .with(P::PointRadius, 3.0)
            .with(P::PointHaloRadius, 1.0)
            .with(P::PointHaloColor, POINT_HALO)
            .with(P::OffsetX, 0.0)
            .with(P::OffsetY, 0.0)
            .with(P::GlobalAlpha, 1.0),
        GeometryKind::Line => base
            .with(P::StrokeStyle, ColorValue::BLACK)
            .with(P::LineWidth, 1.0)
            .with(P::LineCap, "butt")
            .with(P::LineJoin, "round")
            .with(P::MiterLimit, 10.0)
            .with(P::LineDashOffset, 0.0)
            .with(P::GlobalAlpha, 1.0)
            .with(P::LineDasharray, StyleValue::DashArray(Vec::new()))
            .with(P::Offset, 0.0),
        GeometryKind::Region => base
            .with(P::StrokeStyle, ColorValue::TRANSPARENT)
            .with(P::FillStyle, REGION_FILL)
            .with(P::LineWidth, 1.0)
            .with(P::LineCap, "butt")
            .with(P::LineJoin, "miter")
            .with(P::MiterLimit, 4.0)
            .with(P::LineDashOffset, 0.0)
            .with(P::LineOpacity, 1.0)
            .with(P::LineDasharray, StyleValue::DashArray(Vec::new()))
            .with(P::OffsetX, 0.0)
            .with(P::OffsetY, 0.0)
            .with(P::PolygonOpacity, 1.0),
        GeometryKind::Text => base
            .with(P::Font, "10px sans-serif")
            .with(P::TextHeight, 10.0)
            .with(P::TextAlign, "center")
            .with(P::TextBaseline, "middle")
            .with(P::HaloRadius, 0.0)
            .with(P::BackColor, ColorValue::WHITE)
            .with(P::ForeColor, ColorValue::BLACK)
            .with(P::GlobalAlpha, 1.0)
            .with(P::OffsetX, 0.0)
            .with(P::OffsetY, 0.0),
    }
}
