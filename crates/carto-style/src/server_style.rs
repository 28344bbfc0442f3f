//! Styles delivered by the map service, and the metadata that maps them onto
//! canonical properties.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::color::ServerColor;
use crate::property::CanvasProperty;
use crate::units::Unit;

/// Highest fill symbol id with a built-in rendering.
pub const MAX_FILL_SYMBOL_ID: u8 = 7;

/// Highest line symbol id with a built-in rendering.
pub const MAX_LINE_SYMBOL_ID: u8 = 5;

/// Style of point, line and region features as sent by the map service.
///
/// Every attribute is optional; only attributes present in the payload take
/// part in resolution. Sizes are in millimetres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStyle {
    /// Whether the pattern background is opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_back_opaque: Option<bool>,
    /// Line width in millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    /// Pattern background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_back_color: Option<ServerColor>,
    /// Marker width in millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_width: Option<f64>,
    /// Marker rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_angle: Option<f64>,
    /// Fill foreground color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_fore_color: Option<ServerColor>,
    /// Legacy foreground color; also drives the fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fore_color: Option<ServerColor>,
    /// Marker size in millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<f64>,
    /// Horizontal gradient center offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_gradient_offset_ratio_x: Option<f64>,
    /// Vertical gradient center offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_gradient_offset_ratio_y: Option<f64>,
    /// Line color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_color: Option<ServerColor>,
    /// Fill opacity in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opaque_rate: Option<f64>,
    /// Marker height in millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_height: Option<f64>,
    /// Gradient mode keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_gradient_mode: Option<String>,
    /// Fill symbol id.
    #[serde(rename = "fillSymbolID", default, skip_serializing_if = "Option::is_none")]
    pub fill_symbol_id: Option<i64>,
    /// Gradient angle in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_gradient_angle: Option<f64>,
    /// Marker symbol id.
    #[serde(rename = "markerSymbolID", default, skip_serializing_if = "Option::is_none")]
    pub marker_symbol_id: Option<i64>,
    /// Line symbol id.
    #[serde(rename = "lineSymbolID", default, skip_serializing_if = "Option::is_none")]
    pub line_symbol_id: Option<i64>,
}

/// Kind of value a server attribute carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    /// A number, possibly with a unit.
    Number,
    /// A `{red, green, blue}` color.
    Color,
    /// A keyword.
    String,
    /// A flag.
    Boolean,
}

/// Default of a server attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// No meaningful default.
    Unset,
    /// A number.
    Number(f64),
    /// A color.
    Color(ServerColor),
    /// A keyword.
    Keyword(&'static str),
    /// A flag.
    Boolean(bool),
}

/// Metadata for one server attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeMeta {
    /// Canonical property the attribute drives, `None` when not drawable.
    pub canvas: Option<CanvasProperty>,
    /// Kind of value.
    pub kind: ValueKind,
    /// Physical unit of numeric values.
    pub unit: Option<Unit>,
    /// Value assumed when the attribute is absent.
    pub default: DefaultValue,
}

/// A server style attribute name.
///
/// Declaration order is the order in which attributes are applied; two
/// attributes that drive the same canonical property resolve last-wins in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum ServerAttribute {
    /// `fillBackOpaque`
    FillBackOpaque,
    /// `lineWidth`
    LineWidth,
    /// `fillBackColor`
    FillBackColor,
    /// `markerWidth`
    MarkerWidth,
    /// `markerAngle`
    MarkerAngle,
    /// `fillForeColor`
    FillForeColor,
    /// `foreColor`
    ForeColor,
    /// `markerSize`
    MarkerSize,
    /// `fillGradientOffsetRatioX`
    FillGradientOffsetRatioX,
    /// `fillGradientOffsetRatioY`
    FillGradientOffsetRatioY,
    /// `lineColor`
    LineColor,
    /// `fillOpaqueRate`
    FillOpaqueRate,
    /// `markerHeight`
    MarkerHeight,
    /// `fillGradientMode`
    FillGradientMode,
    /// `fillSymbolID`
    #[strum(serialize = "fillSymbolID")]
    FillSymbolId,
    /// `fillGradientAngle`
    FillGradientAngle,
    /// `markerSymbolID`
    #[strum(serialize = "markerSymbolID")]
    MarkerSymbolId,
    /// `lineSymbolID`
    #[strum(serialize = "lineSymbolID")]
    LineSymbolId,
}

impl ServerAttribute {
    /// Metadata of the attribute.
    #[must_use]
    pub const fn meta(self) -> AttributeMeta {
        const fn meta(
            canvas: Option<CanvasProperty>,
            kind: ValueKind,
            unit: Option<Unit>,
            default: DefaultValue,
        ) -> AttributeMeta {
            AttributeMeta {
                canvas,
                kind,
                unit,
                default,
            }
        }
        const BLACK: DefaultValue = DefaultValue::Color(ServerColor::new(0, 0, 0));
        const MM: Option<Unit> = Some(Unit::Millimeter);
        const DEG: Option<Unit> = Some(Unit::Degree);

        match self {
            Self::FillBackOpaque => meta(None, ValueKind::Boolean, None, DefaultValue::Boolean(true)),
            Self::LineWidth => meta(
                Some(CanvasProperty::LineWidth),
                ValueKind::Number,
                MM,
                DefaultValue::Number(0.1),
            ),
            Self::FillBackColor => meta(None, ValueKind::Color, None, BLACK),
            Self::MarkerWidth => meta(None, ValueKind::Number, MM, DefaultValue::Unset),
            Self::MarkerAngle => meta(None, ValueKind::Number, DEG, DefaultValue::Unset),
            Self::FillForeColor | Self::ForeColor => {
                meta(Some(CanvasProperty::FillStyle), ValueKind::Color, None, BLACK)
            }
            Self::MarkerSize => meta(
                Some(CanvasProperty::MarkerSize),
                ValueKind::Number,
                MM,
                DefaultValue::Number(2.4),
            ),
            Self::FillGradientOffsetRatioX
            | Self::FillGradientOffsetRatioY
            | Self::FillSymbolId
            | Self::MarkerSymbolId
            | Self::LineSymbolId => meta(None, ValueKind::Number, None, DefaultValue::Number(0.0)),
            Self::LineColor => meta(Some(CanvasProperty::StrokeStyle), ValueKind::Color, None, BLACK),
            Self::FillOpaqueRate => meta(None, ValueKind::Number, None, DefaultValue::Number(100.0)),
            Self::MarkerHeight => meta(None, ValueKind::Number, MM, DefaultValue::Number(0.0)),
            Self::FillGradientMode => {
                meta(None, ValueKind::String, None, DefaultValue::Keyword("NONE"))
            }
            Self::FillGradientAngle => meta(None, ValueKind::Number, DEG, DefaultValue::Number(0.0)),
        }
    }
}

/// A present server attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerValue<'a> {
    /// A number.
    Number(f64),
    /// A color.
    Color(ServerColor),
    /// A keyword.
    Keyword(&'a str),
    /// A flag.
    Boolean(bool),
}

impl ServerStyle {
    /// Value of one attribute, if present.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, attribute: ServerAttribute) -> Option<ServerValue<'_>> {
        let number = |v: Option<f64>| v.map(ServerValue::Number);
        let id = |v: Option<i64>| v.map(|id| ServerValue::Number(id as f64));
        let color = |v: Option<ServerColor>| v.map(ServerValue::Color);
        match attribute {
            ServerAttribute::FillBackOpaque => self.fill_back_opaque.map(ServerValue::Boolean),
            ServerAttribute::LineWidth => number(self.line_width),
            ServerAttribute::FillBackColor => color(self.fill_back_color),
            ServerAttribute::MarkerWidth => number(self.marker_width),
            ServerAttribute::MarkerAngle => number(self.marker_angle),
            ServerAttribute::FillForeColor => color(self.fill_fore_color),
            ServerAttribute::ForeColor => color(self.fore_color),
            ServerAttribute::MarkerSize => number(self.marker_size),
            ServerAttribute::FillGradientOffsetRatioX => number(self.fill_gradient_offset_ratio_x),
            ServerAttribute::FillGradientOffsetRatioY => number(self.fill_gradient_offset_ratio_y),
            ServerAttribute::LineColor => color(self.line_color),
            ServerAttribute::FillOpaqueRate => number(self.fill_opaque_rate),
            ServerAttribute::MarkerHeight => number(self.marker_height),
            ServerAttribute::FillGradientMode => {
                self.fill_gradient_mode.as_deref().map(ServerValue::Keyword)
            }
            ServerAttribute::FillSymbolId => id(self.fill_symbol_id),
            ServerAttribute::FillGradientAngle => number(self.fill_gradient_angle),
            ServerAttribute::MarkerSymbolId => id(self.marker_symbol_id),
            ServerAttribute::LineSymbolId => id(self.line_symbol_id),
        }
    }

    /// A copy with every absent attribute that has a default filled in.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        let mut out = self.clone();
        let num = |attr: ServerAttribute| match attr.meta().default {
            DefaultValue::Number(n) => Some(n),
            _ => None,
        };
        let col = |attr: ServerAttribute| match attr.meta().default {
            DefaultValue::Color(c) => Some(c),
            _ => None,
        };
        out.fill_back_opaque = out.fill_back_opaque.or(Some(true));
        out.line_width = out.line_width.or_else(|| num(ServerAttribute::LineWidth));
        out.fill_back_color = out.fill_back_color.or_else(|| col(ServerAttribute::FillBackColor));
        out.fill_fore_color = out.fill_fore_color.or_else(|| col(ServerAttribute::FillForeColor));
        out.marker_size = out.marker_size.or_else(|| num(ServerAttribute::MarkerSize));
        out.fill_gradient_offset_ratio_x = out
            .fill_gradient_offset_ratio_x
            .or_else(|| num(ServerAttribute::FillGradientOffsetRatioX));
        out.fill_gradient_offset_ratio_y = out
            .fill_gradient_offset_ratio_y
            .or_else(|| num(ServerAttribute::FillGradientOffsetRatioY));
        out.line_color = out.line_color.or_else(|| col(ServerAttribute::LineColor));
        out.fill_opaque_rate = out
            .fill_opaque_rate
            .or_else(|| num(ServerAttribute::FillOpaqueRate));
        out.marker_height = out.marker_height.or_else(|| num(ServerAttribute::MarkerHeight));
        if out.fill_gradient_mode.is_none() {
            out.fill_gradient_mode = Some("NONE".to_string());
        }
        out.fill_symbol_id = out.fill_symbol_id.or(Some(0));
        out.fill_gradient_angle = out
            .fill_gradient_angle
            .or_else(|| num(ServerAttribute::FillGradientAngle));
        out.marker_symbol_id = out.marker_symbol_id.or(Some(0));
        out.line_symbol_id = out.line_symbol_id.or(Some(0));
        out
    }
}

/// Clamp a raw symbol id to `0..=max`; anything outside resolves as 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_symbol_id(raw: Option<i64>, max: u8) -> u8 {
    match raw {
        Some(id) if (0..=i64::from(max)).contains(&id) => id as u8,
        _ => 0,
    }
}

/// Text style of label features as sent by the map service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Font height in millimetres.
    pub font_height: f64,
    /// Font family; a leading `@` marks vertical writing.
    pub font_name: String,
    /// Combined alignment code such as `TOPLEFT` or `BASELINECENTER`.
    pub align: String,
    /// Draw a halo around the glyphs.
    pub outline: bool,
    /// Halo color.
    pub back_color: ServerColor,
    /// Glyph color.
    pub fore_color: ServerColor,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            font_height: 6.0,
            font_name: "Times New Roman".to_string(),
            align: "BASELINECENTER".to_string(),
            outline: false,
            back_color: ServerColor::new(255, 255, 255),
            fore_color: ServerColor::new(0, 0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_server_style_json_keys() {
        let style: ServerStyle = serde_json::from_str(
            r#"{"lineWidth":0.1,"lineColor":{"red":0,"green":0,"blue":0},
                "fillSymbolID":3,"lineSymbolID":1,"markerSize":2.4,"unknownKey":1}"#,
        )
        .unwrap();
        assert_eq!(style.line_width, Some(0.1));
        assert_eq!(style.fill_symbol_id, Some(3));
        assert_eq!(style.line_symbol_id, Some(1));
        assert_eq!(style.marker_size, Some(2.4));
        assert_eq!(style.fill_fore_color, None);
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(ServerAttribute::FillSymbolId.to_string(), "fillSymbolID");
        assert_eq!(ServerAttribute::FillGradientOffsetRatioX.to_string(), "fillGradientOffsetRatioX");
    }

    #[test]
    fn test_drawable_attributes() {
        let drawable: Vec<_> = ServerAttribute::iter()
            .filter(|a| a.meta().canvas.is_some())
            .collect();
        assert_eq!(
            drawable,
            vec![
                ServerAttribute::LineWidth,
                ServerAttribute::FillForeColor,
                ServerAttribute::ForeColor,
                ServerAttribute::MarkerSize,
                ServerAttribute::LineColor,
            ]
        );
    }

    #[test]
    fn test_value_kinds_match_meta() {
        let style = ServerStyle::default().with_defaults();
        for attribute in ServerAttribute::iter() {
            let Some(value) = style.value(attribute) else {
                continue;
            };
            let kind = match value {
                ServerValue::Number(_) => ValueKind::Number,
                ServerValue::Color(_) => ValueKind::Color,
                ServerValue::Keyword(_) => ValueKind::String,
                ServerValue::Boolean(_) => ValueKind::Boolean,
            };
            assert_eq!(kind, attribute.meta().kind, "{attribute}");
        }
    }

    #[test]
    fn test_with_defaults_keeps_present_values() {
        let style = ServerStyle {
            line_width: Some(0.5),
            ..ServerStyle::default()
        }
        .with_defaults();
        assert_eq!(style.line_width, Some(0.5));
        assert_eq!(style.marker_size, Some(2.4));
        assert_eq!(style.fill_symbol_id, Some(0));
        assert_eq!(style.fill_gradient_mode.as_deref(), Some("NONE"));
        // no meaningful default
        assert_eq!(style.marker_width, None);
    }

    #[test]
    fn test_clamp_symbol_id() {
        assert_eq!(clamp_symbol_id(Some(3), MAX_FILL_SYMBOL_ID), 3);
        assert_eq!(clamp_symbol_id(Some(7), MAX_FILL_SYMBOL_ID), 7);
        assert_eq!(clamp_symbol_id(Some(8), MAX_FILL_SYMBOL_ID), 0);
        assert_eq!(clamp_symbol_id(Some(-1), MAX_FILL_SYMBOL_ID), 0);
        assert_eq!(clamp_symbol_id(None, MAX_LINE_SYMBOL_ID), 0);
        assert_eq!(clamp_symbol_id(Some(6), MAX_LINE_SYMBOL_ID), 0);
    }

    #[test]
    fn test_text_style_defaults_fill_missing_keys() {
        let style: TextStyle = serde_json::from_str(r#"{"fontName":"Arial"}"#).unwrap();
        assert_eq!(style.font_name, "Arial");
        assert!((style.font_height - 6.0).abs() < f64::EPSILON);
        assert_eq!(style.align, "BASELINECENTER");
    }
}
