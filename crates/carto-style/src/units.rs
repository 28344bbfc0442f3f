//! Physical unit conversion for server styles.
//!
//! Server styles express sizes in millimetres. The canvas works in pixels at
//! a fixed screen resolution.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Screen resolution assumed for unit conversion.
pub const DOTS_PER_INCH: f64 = 96.0;

/// Inches per millimetre.
pub const INCHES_PER_MILLIMETER: f64 = 0.039_37;

/// Correction applied to converted line widths.
pub const LINE_WIDTH_SCALE: f64 = 2.5;

/// Correction applied to converted font heights.
pub const FONT_HEIGHT_SCALE: f64 = 0.9;

/// Physical unit of a server style attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimetres.
    #[strum(serialize = "mm")]
    #[serde(rename = "mm")]
    Millimeter,
    /// Angular degrees; not a length.
    Degree,
}

impl Unit {
    /// Inches per unit, or `None` for units that are not lengths.
    #[must_use]
    pub const fn inches_per_unit(self) -> Option<f64> {
        match self {
            Self::Millimeter => Some(INCHES_PER_MILLIMETER),
            Self::Degree => None,
        }
    }

    /// Convert a value in this unit to pixels; non-length values pass through.
    #[must_use]
    pub fn to_pixels(self, value: f64) -> f64 {
        self.inches_per_unit()
            .map_or(value, |inches| value * DOTS_PER_INCH * inches)
    }
}

/// Convert millimetres to pixels.
#[must_use]
pub fn mm_to_px(mm: f64) -> f64 {
    Unit::Millimeter.to_pixels(mm)
}
