//! Style resolution: from shader rules or server styles to a canonical style.
//!
//! Every function here is pure. Missing values, unmapped properties and
//! out-of-range symbol ids fall back to table defaults instead of failing;
//! the only error is a pattern fill whose bitmap cannot be used.
//!
//! The base pass of a whole-sublayer render is [`resolve_carto_style`] (or
//! [`resolve_from_server_style`] for server-styled layers). The highlight
//! pass is [`overlay_highlight`], which layers a second shader over the base
//! result and returns a new record.

mod pattern;
mod rules;
mod server;

pub use pattern::{INK_THRESHOLD, PATTERN_TILE_SIZE, recolor_pattern};
pub use rules::resolve_from_rules;
pub use server::{
    EMPTY_FILL_SYMBOL_ID, FillImages, INVISIBLE_LINE_SYMBOL_ID, ServerStyleContext,
    ServerStyleSource, dash_preset, marker_url, resolve_from_server_style,
};

use crate::canonical::CanonicalStyle;
use crate::geometry::GeometryKind;
use crate::shader::{Attributes, Shader, ShaderRule};
use crate::style_maps::StyleMaps;

/// Filter outcome used by the base pass.
const BASE_PASS_FILTER: Option<bool> = Some(true);

/// Complete `partial` with the defaults for `kind`.
///
/// The result holds exactly the properties of the kind's default table:
/// values from `partial` where present, defaults elsewhere.
#[must_use]
pub fn resolve_defaults(kind: GeometryKind, partial: &CanonicalStyle) -> CanonicalStyle {
    StyleMaps::global()
        .default_style(kind)
        .iter()
        .map(|(property, default)| {
            let value = partial.get(*property).unwrap_or(default);
            (*property, value.clone())
        })
        .collect()
}

/// Base style of a feature styled by CartoCSS rules: rules, then defaults.
#[must_use]
pub fn resolve_carto_style(
    kind: GeometryKind,
    attributes: &Attributes,
    rules: &[ShaderRule],
    zoom: f64,
) -> CanonicalStyle {
    let partial = resolve_from_rules(kind, attributes, rules, zoom, BASE_PASS_FILTER);
    resolve_defaults(kind, &partial)
}

/// Layer the highlight `shader` over `base`.
///
/// Properties the shader sets replace those of `base`; everything else is
/// kept. `base` itself is left untouched.
#[must_use]
pub fn overlay_highlight(
    base: &CanonicalStyle,
    kind: GeometryKind,
    attributes: &Attributes,
    shader: &Shader,
    zoom: f64,
    filter: Option<bool>,
) -> CanonicalStyle {
    let overlay = resolve_from_rules(kind, attributes, shader.rules(), zoom, filter);
    base.merged_with(&overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::CanvasProperty;
    use crate::value::StyleValue;
    use strum::IntoEnumIterator;

    #[test]
    fn test_defaults_total_on_empty_partial() {
        for kind in GeometryKind::iter() {
            let resolved = resolve_defaults(kind, &CanonicalStyle::new());
            assert_eq!(&resolved, StyleMaps::global().default_style(kind), "{kind}");
        }
    }

    #[test]
    fn test_defaults_drop_foreign_properties() {
        let partial = CanonicalStyle::new()
            .with(CanvasProperty::LineWidth, 4.0)
            .with(CanvasProperty::Font, "12px serif");
        let resolved = resolve_defaults(GeometryKind::Line, &partial);
        assert_eq!(resolved.number(CanvasProperty::LineWidth), Some(4.0));
        assert!(!resolved.contains(CanvasProperty::Font));
    }

    #[test]
    fn test_base_pass_sees_passing_filter() {
        let rule = ShaderRule::new("line-width", |_: &Attributes, _: f64, filter: Option<bool>| {
            filter.map(|passed| StyleValue::Number(if passed { 5.0 } else { 0.0 }))
        });
        let style = resolve_carto_style(GeometryKind::Line, &Attributes::new(), &[rule], 1.0);
        assert_eq!(style.number(CanvasProperty::LineWidth), Some(5.0));
    }

    #[test]
    fn test_overlay_leaves_base_untouched() {
        let base = resolve_carto_style(GeometryKind::Line, &Attributes::new(), &[], 1.0);
        let shader = Shader::new(vec![ShaderRule::constant("line-width", 8.0)]);
        let highlighted =
            overlay_highlight(&base, GeometryKind::Line, &Attributes::new(), &shader, 1.0, None);

        assert_eq!(highlighted.number(CanvasProperty::LineWidth), Some(8.0));
        assert_eq!(base.number(CanvasProperty::LineWidth), Some(1.0));
        assert_eq!(highlighted.len(), base.len());
    }
}
