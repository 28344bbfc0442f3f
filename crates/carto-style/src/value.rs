//! Values stored in a canonical style.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::color::ColorValue;

/// A pattern fill synthesized from a preloaded symbol bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillPattern {
    /// Fill symbol id the pattern was built from.
    pub symbol_id: u8,
    /// Tile width in pixels.
    pub width: u32,
    /// Tile height in pixels.
    pub height: u32,
    /// Recolored RGBA pixels of one tile, repeated in both directions.
    #[serde(skip)]
    pub rgba: Vec<u8>,
}

/// A resolved style value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// A plain number (widths, radii, opacities, offsets).
    Number(f64),
    /// A keyword or free string (`"round"`, font descriptors, URLs).
    Text(String),
    /// A color.
    Color(ColorValue),
    /// A dash pattern.
    DashArray(Vec<f64>),
    /// A repeating fill pattern.
    Pattern(FillPattern),
}

impl StyleValue {
    /// Numeric view of the value; numeric strings are parsed.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String view of a [`StyleValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON literal into a style value.
    ///
    /// Numbers stay numbers, arrays of numbers become dash arrays, strings
    /// that parse as colors become colors and other strings stay text.
    /// `null`, booleans, objects and mixed arrays have no style value.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(
                ColorValue::parse(s).map_or_else(|| Self::Text(s.clone()), Self::Color),
            ),
            Value::Array(items) => items
                .iter()
                .map(Value::as_f64)
                .collect::<Option<Vec<_>>>()
                .map(Self::DashArray),
            Value::Null | Value::Bool(_) | Value::Object(_) => None,
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ColorValue> for StyleValue {
    fn from(value: ColorValue) -> Self {
        Self::Color(value)
    }
}

/// Formats the value the way it appears inside a canvas font descriptor.
impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Color(c) => write!(f, "{c}"),
            Self::DashArray(parts) => {
                let joined: Vec<String> = parts.iter().map(ToString::to_string).collect();
                f.write_str(&joined.join(","))
            }
            Self::Pattern(p) => write!(f, "pattern(System {})", p.symbol_id),
        }
    }
}
