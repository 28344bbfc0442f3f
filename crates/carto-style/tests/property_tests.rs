//! Property tests for resolution determinism, defaulting and symbol id clamping.

use carto_style::server_style::{MAX_FILL_SYMBOL_ID, MAX_LINE_SYMBOL_ID, clamp_symbol_id};
use carto_style::{
    Attributes, CanonicalStyle, CanvasProperty, FillImages, GeometryKind, ServerColor, ServerStyle,
    ServerStyleContext, ServerStyleSource, ShaderRule, StyleMaps, resolve_defaults,
    resolve_from_rules, resolve_from_server_style,
};
use quickcheck_macros::quickcheck;

const KINDS: [GeometryKind; 4] = [
    GeometryKind::Point,
    GeometryKind::Line,
    GeometryKind::Region,
    GeometryKind::Text,
];

const PROPERTIES: [&str; 8] = [
    "line-width",
    "line-color",
    "point-radius",
    "polygon-opacity",
    "text-size",
    "text-face-name",
    "point-comp-op",
    "no-such-property",
];

fn rules_from(seed: &[(u8, u16)]) -> Vec<ShaderRule> {
    seed.iter()
        .map(|&(property, value)| {
            let property = PROPERTIES[usize::from(property) % PROPERTIES.len()];
            ShaderRule::constant(property, f64::from(value))
        })
        .collect()
}

#[quickcheck]
fn prop_rule_resolution_is_deterministic(kind: u8, seed: Vec<(u8, u16)>, zoom: u8) -> bool {
    let kind = KINDS[usize::from(kind) % KINDS.len()];
    let rules = rules_from(&seed);
    let attrs = Attributes::new();
    let zoom = f64::from(zoom);
    resolve_from_rules(kind, &attrs, &rules, zoom, None)
        == resolve_from_rules(kind, &attrs, &rules, zoom, None)
}

#[quickcheck]
fn prop_last_rule_wins(first: u16, second: u16) -> bool {
    let rules = [
        ShaderRule::constant("line-width", f64::from(first)),
        ShaderRule::constant("line-width", f64::from(second)),
    ];
    let style = resolve_from_rules(GeometryKind::Line, &Attributes::new(), &rules, 0.0, None);
    style.number(CanvasProperty::LineWidth) == Some(f64::from(second))
}

#[quickcheck]
fn prop_defaults_cover_the_kind_table(kind: u8, seed: Vec<(u8, u16)>) -> bool {
    let kind = KINDS[usize::from(kind) % KINDS.len()];
    let partial = resolve_from_rules(kind, &Attributes::new(), &rules_from(&seed), 0.0, None);
    let resolved = resolve_defaults(kind, &partial);
    let table = StyleMaps::global().default_style(kind);
    resolved.len() == table.len() && table.iter().all(|(property, _)| resolved.contains(*property))
}

#[quickcheck]
fn prop_overflowing_symbol_ids_resolve_as_zero(fill: i64, line: i64) -> bool {
    let fill_ok = (0..=i64::from(MAX_FILL_SYMBOL_ID)).contains(&fill)
        || clamp_symbol_id(Some(fill), MAX_FILL_SYMBOL_ID) == 0;
    let line_ok = (0..=i64::from(MAX_LINE_SYMBOL_ID)).contains(&line)
        || clamp_symbol_id(Some(line), MAX_LINE_SYMBOL_ID) == 0;
    fill_ok && line_ok
}

#[quickcheck]
fn prop_overflowing_line_ids_draw_like_zero(id: u8, red: u8, green: u8, blue: u8) -> bool {
    let id = i64::from(id.max(MAX_LINE_SYMBOL_ID + 1));
    let base = ServerStyle {
        line_color: Some(ServerColor::new(red, green, blue)),
        fill_fore_color: Some(ServerColor::new(blue, green, red)),
        ..ServerStyle::default()
    };
    let overflow = ServerStyle {
        line_symbol_id: Some(id),
        fill_symbol_id: Some(id.max(i64::from(MAX_FILL_SYMBOL_ID) + 1)),
        ..base.clone()
    };
    let zero = ServerStyle {
        line_symbol_id: Some(0),
        fill_symbol_id: Some(0),
        ..base
    };
    let images = FillImages::new();
    let ctx = ServerStyleContext {
        layer_url: "http://localhost/map",
        fill_images: &images,
    };
    let resolve = |style: &ServerStyle| {
        resolve_from_server_style(GeometryKind::Region, ServerStyleSource::Style(style), &ctx)
    };
    resolve(&overflow) == resolve(&zero)
}

#[test]
fn test_empty_partial_defaults_equal_table() {
    for kind in KINDS {
        assert_eq!(
            &resolve_defaults(kind, &CanonicalStyle::new()),
            StyleMaps::global().default_style(kind)
        );
    }
}
