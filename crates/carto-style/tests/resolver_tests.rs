//! Integration tests for style resolution.

use carto_common::error::RenderError;
use carto_common::image::Bitmap;
use carto_style::{
    Attributes, CanonicalStyle, CanvasProperty, ColorValue, FillImages, GeometryKind,
    ServerColor, ServerStyle, ServerStyleContext, ServerStyleSource, Shader, ShaderRule,
    StyleMaps, StyleValue, TextStyle, overlay_highlight, resolve_carto_style, resolve_defaults,
    resolve_from_rules, resolve_from_server_style,
};
use serde_json::json;

fn attrs(value: serde_json::Value) -> Attributes {
    value.as_object().cloned().unwrap_or_default()
}

fn server(
    kind: GeometryKind,
    style: &ServerStyle,
    images: &FillImages,
) -> Result<CanonicalStyle, RenderError> {
    let ctx = ServerStyleContext {
        layer_url: "http://localhost:8090/iserver/services/map-world/rest/maps/World",
        fill_images: images,
    };
    resolve_from_server_style(kind, ServerStyleSource::Style(style), &ctx)
}

fn text(style: &TextStyle) -> CanonicalStyle {
    let images = FillImages::new();
    let ctx = ServerStyleContext {
        layer_url: "http://localhost/map",
        fill_images: &images,
    };
    resolve_from_server_style(GeometryKind::Text, ServerStyleSource::Text(style), &ctx).unwrap()
}

#[test]
fn test_font_synthesis_from_text_size() {
    let rules = [ShaderRule::constant("text-size", 12.0)];
    let style = resolve_from_rules(GeometryKind::Text, &Attributes::new(), &rules, 3.0, None);
    assert_eq!(style.text(CanvasProperty::Font), Some("12px/6px sans-serif"));
    assert_eq!(style.number(CanvasProperty::TextHeight), Some(12.0));
}

#[test]
fn test_rules_read_feature_attributes() {
    let rules = [
        ShaderRule::attribute("line-width", "WIDTH"),
        ShaderRule::attribute("line-color", "COLOR"),
    ];
    let a = attrs(json!({"WIDTH": 2.5, "COLOR": "#336699"}));
    let style = resolve_carto_style(GeometryKind::Line, &a, &rules, 3.0);
    assert_eq!(style.number(CanvasProperty::LineWidth), Some(2.5));
    assert_eq!(
        style.get(CanvasProperty::StrokeStyle),
        Some(&StyleValue::Color(ColorValue::rgb(0x33, 0x66, 0x99)))
    );
    assert_eq!(style.text(CanvasProperty::LineCap), Some("butt"));
}

#[test]
fn test_zoom_gated_rules() {
    let rules = [
        ShaderRule::constant("point-radius", 2.0),
        ShaderRule::constant("point-radius", 6.0).zoom_range(Some(10.0), None),
    ];
    let near = resolve_carto_style(GeometryKind::Point, &Attributes::new(), &rules, 12.0);
    let far = resolve_carto_style(GeometryKind::Point, &Attributes::new(), &rules, 4.0);
    assert_eq!(near.number(CanvasProperty::PointRadius), Some(6.0));
    assert_eq!(far.number(CanvasProperty::PointRadius), Some(2.0));
}

#[test]
fn test_region_defaults_complete() {
    let style = resolve_defaults(GeometryKind::Region, &CanonicalStyle::new());
    for property in [
        CanvasProperty::FillStyle,
        CanvasProperty::StrokeStyle,
        CanvasProperty::LineOpacity,
        CanvasProperty::PolygonOpacity,
        CanvasProperty::GlobalCompositeOperation,
    ] {
        assert!(style.contains(property), "{property}");
    }
}

#[test]
fn test_highlight_overlay_precedence() {
    let base = resolve_carto_style(
        GeometryKind::Region,
        &Attributes::new(),
        &[ShaderRule::constant("polygon-fill", ColorValue::rgb(0, 255, 0))],
        5.0,
    );
    let shader = Shader::new(vec![
        ShaderRule::constant("line-color", ColorValue::rgb(255, 0, 0)),
        ShaderRule::constant("line-width", 3.0),
    ]);
    let highlighted =
        overlay_highlight(&base, GeometryKind::Region, &Attributes::new(), &shader, 5.0, None);

    assert_eq!(
        highlighted.get(CanvasProperty::StrokeStyle),
        Some(&StyleValue::Color(ColorValue::rgb(255, 0, 0)))
    );
    assert_eq!(highlighted.number(CanvasProperty::LineWidth), Some(3.0));
    assert_eq!(
        highlighted.get(CanvasProperty::FillStyle),
        base.get(CanvasProperty::FillStyle)
    );
    assert_eq!(
        base.get(CanvasProperty::StrokeStyle),
        StyleMaps::global()
            .default_style(GeometryKind::Region)
            .get(CanvasProperty::StrokeStyle)
    );
}

#[test]
fn test_filtered_highlight_rules() {
    let shader = Shader::new(vec![ShaderRule::constant("line-width", 9.0).filtered()])
        .with_feature_filter(|id| id.0 == 7);
    let base = resolve_carto_style(GeometryKind::Line, &Attributes::new(), &[], 1.0);

    let hit = overlay_highlight(
        &base,
        GeometryKind::Line,
        &Attributes::new(),
        &shader,
        1.0,
        shader.filter_for(carto_style::FeatureId(7)),
    );
    let miss = overlay_highlight(
        &base,
        GeometryKind::Line,
        &Attributes::new(),
        &shader,
        1.0,
        shader.filter_for(carto_style::FeatureId(8)),
    );
    assert_eq!(hit.number(CanvasProperty::LineWidth), Some(9.0));
    assert_eq!(miss, base);
}

#[test]
fn test_server_text_top_left() {
    let style = text(&TextStyle {
        bold: false,
        italic: false,
        font_height: 3.0,
        font_name: "Arial".to_string(),
        align: "TOP LEFT".to_string(),
        outline: false,
        back_color: ServerColor::new(0, 0, 0),
        fore_color: ServerColor::new(255, 255, 255),
    });
    assert_eq!(style.text(CanvasProperty::TextAlign), Some("left"));
    assert_eq!(style.text(CanvasProperty::TextBaseline), Some("top"));
    assert_eq!(style.number(CanvasProperty::HaloRadius), Some(0.0));
    assert_eq!(
        style.get(CanvasProperty::ForeColor),
        Some(&StyleValue::Color(ColorValue::WHITE))
    );
    assert_eq!(style.number(CanvasProperty::GlobalAlpha), Some(1.0));
}

#[test]
fn test_server_text_font() {
    let style = text(&TextStyle {
        bold: true,
        italic: true,
        font_name: "@SimSun".to_string(),
        outline: true,
        ..TextStyle::default()
    });
    let height = 6.0 * 96.0 * 0.039_37 * 0.9;
    assert_eq!(
        style.text(CanvasProperty::Font),
        Some(format!("bolder italic {height}px/5px SimSun").as_str())
    );
    assert_eq!(style.number(CanvasProperty::TextHeight), Some(height));
    assert_eq!(style.text(CanvasProperty::TextAlign), Some("center"));
    assert_eq!(style.text(CanvasProperty::TextBaseline), Some("alphabetic"));
    assert_eq!(style.number(CanvasProperty::HaloRadius), Some(1.0));
}

#[test]
fn test_server_text_alignment_without_vertical_part() {
    let style = text(&TextStyle {
        align: "CENTER".to_string(),
        ..TextStyle::default()
    });
    assert_eq!(style.text(CanvasProperty::TextAlign), Some("center"));
    assert_eq!(style.text(CanvasProperty::TextBaseline), Some("middle"));
}

#[test]
fn test_server_text_alignment_without_horizontal_part() {
    let style = text(&TextStyle {
        align: "BOTTOM".to_string(),
        ..TextStyle::default()
    });
    assert_eq!(style.text(CanvasProperty::TextAlign), Some("center"));
    assert_eq!(style.text(CanvasProperty::TextBaseline), Some("bottom"));
}

#[test]
fn test_server_point_marker_url() {
    let style = ServerStyle {
        marker_size: Some(5.0),
        ..ServerStyle::default()
    };
    let resolved = server(GeometryKind::Point, &style, &FillImages::new()).unwrap();
    let url = resolved.text(CanvasProperty::PointFile).unwrap();
    // ceil(5 * 96 * 0.03937) = 19
    assert!(url.starts_with("http://localhost:8090/iserver/services/map-world/rest/maps/World/symbol.png?"));
    assert!(url.contains("picWidth=19&picHeight=19"));
    assert_eq!(resolved.number(CanvasProperty::GlobalAlpha), Some(1.0));
}

#[test]
fn test_server_region_solid_and_empty_fill() {
    let fore = ServerColor::new(12, 34, 56);
    let solid = ServerStyle {
        fill_fore_color: Some(fore),
        fill_symbol_id: Some(0),
        ..ServerStyle::default()
    };
    let empty = ServerStyle {
        fill_symbol_id: Some(1),
        ..solid.clone()
    };
    let images = FillImages::new();
    assert_eq!(
        server(GeometryKind::Region, &solid, &images).unwrap().get(CanvasProperty::FillStyle),
        Some(&StyleValue::Color(fore.opaque()))
    );
    assert_eq!(
        server(GeometryKind::Region, &empty, &images).unwrap().get(CanvasProperty::FillStyle),
        Some(&StyleValue::Color(fore.with_alpha(0)))
    );
}

#[test]
fn test_server_fill_pattern_recolored() {
    let mut images = FillImages::new();
    images.insert(3, Bitmap::filled(8, 8, [0, 0, 0, 255]));
    let style = ServerStyle {
        fill_fore_color: Some(ServerColor::new(200, 0, 0)),
        fill_symbol_id: Some(3),
        ..ServerStyle::default()
    };
    let resolved = server(GeometryKind::Region, &style, &images).unwrap();
    let Some(StyleValue::Pattern(pattern)) = resolved.get(CanvasProperty::FillStyle) else {
        panic!("expected a pattern fill");
    };
    assert_eq!(pattern.symbol_id, 3);
    assert_eq!((pattern.width, pattern.height), (8, 8));
    assert!(pattern.rgba.chunks(4).all(|px| px == [200, 0, 0, 255]));
}

#[test]
fn test_server_fill_pattern_cross_origin() {
    let mut images = FillImages::new();
    images.insert(2, Bitmap::cross_origin(8, 8, vec![0; 256]));
    let style = ServerStyle {
        fill_fore_color: Some(ServerColor::new(1, 2, 3)),
        fill_symbol_id: Some(2),
        ..ServerStyle::default()
    };
    assert_eq!(
        server(GeometryKind::Region, &style, &images),
        Err(RenderError::CrossOrigin { symbol_id: 2 })
    );
}

#[test]
fn test_server_line_symbols() {
    let color = ServerColor::new(0, 0, 255);
    let with_id = |id| ServerStyle {
        line_color: Some(color),
        line_symbol_id: Some(id),
        ..ServerStyle::default()
    };
    let images = FillImages::new();

    let solid = server(GeometryKind::Line, &with_id(0), &images).unwrap();
    assert_eq!(solid.get(CanvasProperty::StrokeStyle), Some(&StyleValue::Color(color.opaque())));
    assert!(!solid.contains(CanvasProperty::LineDasharray));

    let hidden = server(GeometryKind::Line, &with_id(5), &images).unwrap();
    assert_eq!(
        hidden.get(CanvasProperty::StrokeStyle),
        Some(&StyleValue::Color(color.with_alpha(0)))
    );

    let dashed = server(GeometryKind::Line, &with_id(3), &images).unwrap();
    assert_eq!(
        dashed.get(CanvasProperty::LineDasharray),
        Some(&StyleValue::DashArray(vec![9.7, 3.7, 2.3, 3.7]))
    );
}

#[test]
fn test_server_mismatched_source_uses_defaults() {
    let images = FillImages::new();
    let ctx = ServerStyleContext {
        layer_url: "http://localhost/map",
        fill_images: &images,
    };
    let style = resolve_from_server_style(
        GeometryKind::Text,
        ServerStyleSource::Style(&ServerStyle::default()),
        &ctx,
    )
    .unwrap();
    assert_eq!(style, text(&TextStyle::default()));
}
