//! Resolution of CartoCSS shader rules into canonical properties.

use carto_common::warning::warn_once;

use crate::canonical::CanonicalStyle;
use crate::geometry::GeometryKind;
use crate::property::CanvasProperty;
use crate::shader::{Attributes, ShaderRule};
use crate::style_maps::{CartoTarget, StyleMaps};
use crate::value::StyleValue;

/// Font size used when a rule set names a face but no size.
const DEFAULT_FONT_SIZE: &str = "10px ";

/// Font family used when a rule set names a size but no face.
const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Line gap as a fraction of the font size.
const LINE_GAP_RATIO: f64 = 0.5;

/// Evaluate `rules` in order into a partial style.
///
/// Rules whose property is not mapped for `kind`, or whose evaluator yields
/// nothing, are skipped. Later rules overwrite earlier ones that land on the
/// same canonical property. `text-size` and `text-face-name` combine into
/// `font`, and the size is also reported as `textHeight`. Composite
/// operations without a canvas equivalent leave any earlier value in place.
#[must_use]
pub fn resolve_from_rules(
    kind: GeometryKind,
    attributes: &Attributes,
    rules: &[ShaderRule],
    zoom: f64,
    filter: Option<bool>,
) -> CanonicalStyle {
    let maps = StyleMaps::global();
    let mut style = CanonicalStyle::new();
    let mut font_size: Option<String> = None;
    let mut font_name: Option<String> = None;

    for rule in rules {
        let Some(target) = maps.carto_target(kind, rule.property()) else {
            if rule.mark_unmapped(kind) {
                warn_once(
                    "Style",
                    &format!("property `{}` has no {kind} mapping; skipped", rule.property()),
                );
            }
            continue;
        };
        let Some(value) = rule.evaluate(attributes, zoom, filter) else {
            continue;
        };

        match target {
            CartoTarget::FontSize => {
                let Some(size) = value.as_number() else {
                    warn_once(
                        "Style",
                        &format!("text-size `{value}` is not a number; skipped"),
                    );
                    continue;
                };
                font_size = Some(format!("{size}px/{}px ", size * LINE_GAP_RATIO));
                style.set(CanvasProperty::TextHeight, size);
            }
            CartoTarget::FontName => font_name = Some(value.to_string()),
            CartoTarget::Canvas(CanvasProperty::GlobalCompositeOperation) => {
                let name = value.to_string();
                match maps.composite_operation(&name) {
                    Some(operation) => style.set(CanvasProperty::GlobalCompositeOperation, operation),
                    None => warn_once(
                        "Style",
                        &format!("composite operation `{name}` has no canvas equivalent"),
                    ),
                }
            }
            CartoTarget::Canvas(property) => style.set(property, value),
        }
    }

    if font_size.is_some() || font_name.is_some() {
        let size = font_size.as_deref().unwrap_or(DEFAULT_FONT_SIZE);
        let family = font_name.as_deref().unwrap_or(DEFAULT_FONT_FAMILY);
        style.set(CanvasProperty::Font, StyleValue::Text(format!("{size}{family}")));
    }
    style
}
