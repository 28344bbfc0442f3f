//! Resolution of styles delivered by the map service.

use std::collections::HashMap;

use carto_common::error::RenderError;
use carto_common::image::Bitmap;
use carto_common::url::{append_query, join_path, parameter_string};
use carto_common::warning::warn_once;
use strum::IntoEnumIterator;

use crate::canonical::CanonicalStyle;
use crate::color::ServerColor;
use crate::geometry::GeometryKind;
use crate::property::CanvasProperty;
use crate::resolver::pattern::recolor_pattern;
use crate::server_style::{
    MAX_FILL_SYMBOL_ID, MAX_LINE_SYMBOL_ID, ServerAttribute, ServerStyle, ServerValue, TextStyle,
    ValueKind, clamp_symbol_id,
};
use crate::style_maps::StyleMaps;
use crate::units::{FONT_HEIGHT_SCALE, LINE_WIDTH_SCALE, Unit, mm_to_px};
use crate::value::StyleValue;

/// Line symbol id drawn without a stroke.
pub const INVISIBLE_LINE_SYMBOL_ID: u8 = 5;

/// Fill symbol id drawn without a fill.
pub const EMPTY_FILL_SYMBOL_ID: u8 = 1;

const DASH_LONG: &[f64] = &[9.7, 3.7];
const DASH_SHORT: &[f64] = &[3.7, 3.7];
const DASH_DOT: &[f64] = &[9.7, 3.7, 2.3, 3.7];
const DASH_DOT_DOT: &[f64] = &[9.7, 3.7, 2.3, 3.7, 2.3, 3.7];
const DASH_SOLID: &[f64] = &[1.0, 0.0];

/// Line height appended to server fonts; the service has no such setting.
const SERVER_LINE_HEIGHT: &str = "5px";

/// Endpoint, relative to the layer URL, that renders marker symbols.
const SYMBOL_RESOURCE: &str = "symbol.png";

/// Dash pattern approximating a dashed line symbol.
#[must_use]
pub fn dash_preset(line_symbol_id: u8) -> &'static [f64] {
    match line_symbol_id {
        1 => DASH_LONG,
        2 => DASH_SHORT,
        3 => DASH_DOT,
        4 => DASH_DOT_DOT,
        _ => DASH_SOLID,
    }
}

/// Preloaded fill symbol bitmaps, keyed by fill symbol id.
#[derive(Debug, Clone, Default)]
pub struct FillImages {
    images: HashMap<u8, Bitmap>,
}

impl FillImages {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bitmap for a fill symbol id.
    pub fn insert(&mut self, symbol_id: u8, bitmap: Bitmap) {
        let _ = self.images.insert(symbol_id, bitmap);
    }

    /// Bitmap of a fill symbol id.
    #[must_use]
    pub fn get(&self, symbol_id: u8) -> Option<&Bitmap> {
        self.images.get(&symbol_id)
    }
}

impl FromIterator<(u8, Bitmap)> for FillImages {
    fn from_iter<I: IntoIterator<Item = (u8, Bitmap)>>(iter: I) -> Self {
        Self {
            images: iter.into_iter().collect(),
        }
    }
}

/// The server style a feature is drawn with.
#[derive(Debug, Clone, Copy)]
pub enum ServerStyleSource<'a> {
    /// Point, line or region style.
    Style(&'a ServerStyle),
    /// Label style.
    Text(&'a TextStyle),
}

/// Layer-level inputs of server style resolution.
#[derive(Debug, Clone, Copy)]
pub struct ServerStyleContext<'a> {
    /// Base URL of the layer service.
    pub layer_url: &'a str,
    /// Preloaded fill symbol bitmaps.
    pub fill_images: &'a FillImages,
}

/// Resolve a server style into a canonical style.
///
/// POINT yields a marker image URL, TEXT a font with alignment, halo and
/// colors, LINE and REGION a walk over the present attributes in
/// [`ServerAttribute`] order. `globalAlpha` is always 1.
///
/// # Errors
///
/// Fails when a pattern fill is requested and its bitmap is missing or
/// cannot be read back.
pub fn resolve_from_server_style(
    kind: GeometryKind,
    source: ServerStyleSource<'_>,
    ctx: &ServerStyleContext<'_>,
) -> Result<CanonicalStyle, RenderError> {
    let mut style = match (kind, source) {
        (GeometryKind::Text, ServerStyleSource::Text(text)) => from_text_style(text),
        (GeometryKind::Text, ServerStyleSource::Style(_)) => {
            warn_once("Style", "TEXT feature without a text style; using defaults");
            from_text_style(&TextStyle::default())
        }
        (_, ServerStyleSource::Text(_)) => {
            warn_once(
                "Style",
                &format!("{kind} feature given a text style; using defaults"),
            );
            from_shape_style(kind, &ServerStyle::default(), ctx)?
        }
        (_, ServerStyleSource::Style(server)) => from_shape_style(kind, server, ctx)?,
    };

    style.set(CanvasProperty::GlobalAlpha, 1.0);
    Ok(style)
}

fn from_shape_style(
    kind: GeometryKind,
    server: &ServerStyle,
    ctx: &ServerStyleContext<'_>,
) -> Result<CanonicalStyle, RenderError> {
    if kind == GeometryKind::Point {
        return Ok(CanonicalStyle::new().with(
            CanvasProperty::PointFile,
            marker_url(ctx.layer_url, server),
        ));
    }

    let fill_id = clamp_symbol_id(server.fill_symbol_id, MAX_FILL_SYMBOL_ID);
    let line_id = clamp_symbol_id(server.line_symbol_id, MAX_LINE_SYMBOL_ID);
    let mut style = CanonicalStyle::new();

    for attribute in ServerAttribute::iter() {
        let meta = attribute.meta();
        let Some(canvas) = meta.canvas else {
            continue;
        };
        let Some(value) = server.value(attribute) else {
            continue;
        };

        match (meta.kind, value) {
            (ValueKind::Number, ServerValue::Number(n)) => {
                let px = match meta.unit {
                    Some(Unit::Millimeter) => mm_to_px(n) * LINE_WIDTH_SCALE,
                    Some(Unit::Degree) | None => n,
                };
                style.set(canvas, px);
            }
            (ValueKind::Color, ServerValue::Color(color)) => match canvas {
                CanvasProperty::FillStyle => {
                    let fill = fill_value(fill_id, color, server.fill_back_color, ctx)?;
                    style.set(canvas, fill);
                }
                CanvasProperty::StrokeStyle => {
                    let alpha = if line_id == INVISIBLE_LINE_SYMBOL_ID { 0 } else { 255 };
                    if line_id != 0 && line_id != INVISIBLE_LINE_SYMBOL_ID {
                        style.set(
                            CanvasProperty::LineDasharray,
                            StyleValue::DashArray(dash_preset(line_id).to_vec()),
                        );
                    }
                    style.set(canvas, color.with_alpha(alpha));
                }
                _ => style.set(canvas, color.opaque()),
            },
            _ => {}
        }
    }
    Ok(style)
}

fn fill_value(
    fill_id: u8,
    fore: ServerColor,
    back: Option<ServerColor>,
    ctx: &ServerStyleContext<'_>,
) -> Result<StyleValue, RenderError> {
    match fill_id {
        0 => Ok(fore.opaque().into()),
        EMPTY_FILL_SYMBOL_ID => Ok(fore.with_alpha(0).into()),
        id => recolor_pattern(id, ctx.fill_images.get(id), fore, back).map(StyleValue::Pattern),
    }
}

/// URL of the marker image the symbol endpoint renders for `server`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn marker_url(layer_url: &str, server: &ServerStyle) -> String {
    let size_mm = server.with_defaults().marker_size.unwrap_or_default();
    let side = mm_to_px(size_mm).ceil().max(0.0) as u64;
    let json = serde_json::to_string(server).unwrap_or_default();
    let query = parameter_string(&[
        ("transparent", "true".to_string()),
        ("resourceType", "SYMBOLMARKER".to_string()),
        ("picWidth", side.to_string()),
        ("picHeight", side.to_string()),
        ("style", json),
    ]);
    append_query(&join_path(layer_url, SYMBOL_RESOURCE), &query)
}

fn from_text_style(text: &TextStyle) -> CanonicalStyle {
    let height = mm_to_px(text.font_height) * FONT_HEIGHT_SCALE;
    let weight = if text.bold { "bolder" } else { "normal" };
    let slant = if text.italic { "italic" } else { "normal" };
    let family = text.font_name.replace('@', "");
    let font = format!("{weight} {slant} {height}px/{SERVER_LINE_HEIGHT} {family}");

    let mut style = CanonicalStyle::new()
        .with(CanvasProperty::Font, font)
        .with(CanvasProperty::TextHeight, height);

    let horizontal = strip_first(&text.align, &["TOP", "MIDDLE", "BASELINE", "BOTTOM"]);
    let vertical = strip_first(&text.align, &["LEFT", "RIGHT", "CENTER"]);
    let vertical = if vertical.trim() == "BASELINE" {
        "alphabetic".to_string()
    } else {
        vertical
    };
    let defaults = StyleMaps::global().default_style(GeometryKind::Text);
    for (property, raw) in [
        (CanvasProperty::TextAlign, horizontal),
        (CanvasProperty::TextBaseline, vertical),
    ] {
        let keyword = raw.trim().to_lowercase();
        if keyword.is_empty() {
            // the combined code names one axis only
            if let Some(fallback) = defaults.get(property) {
                style.set(property, fallback.clone());
            }
        } else {
            style.set(property, keyword);
        }
    }

    style
        .with(CanvasProperty::HaloRadius, if text.outline { 1.0 } else { 0.0 })
        .with(CanvasProperty::BackColor, text.back_color.opaque())
        .with(CanvasProperty::ForeColor, text.fore_color.opaque())
}

/// Remove the leftmost occurrence of any of `tokens` from `code`.
fn strip_first(code: &str, tokens: &[&str]) -> String {
    let hit = tokens
        .iter()
        .filter_map(|token| code.find(token).map(|at| (at, token.len())))
        .min_by_key(|&(at, _)| at);
    match hit {
        Some((at, len)) => format!("{}{}", &code[..at], &code[at + len..]),
        None => code.to_string(),
    }
}
