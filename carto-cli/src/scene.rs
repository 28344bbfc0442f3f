//! JSON scene files: a layer, its highlight state and its sublayers.

use anyhow::{Context, Result, bail};
use carto_common::image::Bitmap;
use carto_render::{
    Feature, HighlightContext, LayerContext, StyleSource, Sublayer, SublayerOptions,
    SurfaceHandles, SymbolizerBinding,
};
use carto_style::{FeatureId, ServerStyle, Shader, ShaderRule, StyleValue, resolve_carto_style};
use serde::Deserialize;
use serde_json::Value;

/// Top level of a scene file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Scene {
    /// Base URL of the layer service.
    #[serde(default)]
    pub layer_url: String,
    /// Zoom level of the viewport.
    #[serde(default)]
    pub zoom: f64,
    /// Highlight index and shader.
    #[serde(default)]
    pub highlight: Option<HighlightSpec>,
    /// Preloaded fill symbol bitmaps.
    #[serde(default)]
    pub fill_images: Vec<FillImageSpec>,
    /// Sublayers in paint order.
    #[serde(default)]
    pub sublayers: Vec<SublayerSpec>,
}

/// Highlight section of a scene.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct HighlightSpec {
    /// Sublayer names to list in the highlight index.
    pub sublayers: Vec<String>,
    /// Highlight rules.
    pub rules: Vec<RuleSpec>,
    /// Apply the rules to every sublayer instead of the listed ones.
    pub whole_layer: bool,
    /// Restrict the rules to these feature ids.
    pub features: Vec<i64>,
}

/// A solid-color symbol bitmap.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FillImageSpec {
    /// Fill symbol id the bitmap backs.
    pub symbol_id: u8,
    /// Width in pixels.
    #[serde(default = "default_tile")]
    pub width: u32,
    /// Height in pixels.
    #[serde(default = "default_tile")]
    pub height: u32,
    /// RGBA of every pixel.
    pub rgba: [u8; 4],
    /// Whether the bitmap is tainted.
    #[serde(default)]
    pub cross_origin: bool,
}

const fn default_tile() -> u32 {
    8
}

/// Largest fill bitmap a scene may ask for, in pixels.
const MAX_FILL_IMAGE_PIXELS: usize = 4096 * 4096;

impl FillImageSpec {
    fn to_bitmap(&self) -> Result<Bitmap> {
        let Some(count) = (self.width as usize)
            .checked_mul(self.height as usize)
            .filter(|&count| count <= MAX_FILL_IMAGE_PIXELS)
        else {
            bail!(
                "fill image {}: {}x{} exceeds {MAX_FILL_IMAGE_PIXELS} pixels",
                self.symbol_id,
                self.width,
                self.height
            );
        };
        let pixels = self.rgba.repeat(count);
        Ok(if self.cross_origin {
            Bitmap::cross_origin(self.width, self.height, pixels)
        } else {
            Bitmap::new(self.width, self.height, pixels)
        })
    }
}

/// One sublayer of a scene.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SublayerSpec {
    /// Layer name; the id is derived from it.
    pub name: String,
    /// Construction options.
    #[serde(default)]
    pub options: SublayerOptions,
    /// Server style source.
    #[serde(default)]
    pub server_style: Option<ServerStyle>,
    /// CartoCSS rule source.
    #[serde(default)]
    pub rules: Option<Vec<RuleSpec>>,
    /// One single-feature binding per feature instead of a whole-sublayer binding.
    #[serde(default)]
    pub per_feature: bool,
    /// Features.
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A shader rule: a constant `value` or an `attribute` lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSpec {
    /// CartoCSS property name.
    pub property: String,
    /// Constant value.
    #[serde(default)]
    pub value: Option<Value>,
    /// Attribute to read the value from.
    #[serde(default)]
    pub attribute: Option<String>,
    /// Lowest zoom the rule applies at.
    #[serde(default)]
    pub min_zoom: Option<f64>,
    /// Highest zoom the rule applies at.
    #[serde(default)]
    pub max_zoom: Option<f64>,
}

impl RuleSpec {
    fn to_rule(&self) -> Result<ShaderRule> {
        let rule = match (&self.value, &self.attribute) {
            (Some(value), None) => {
                let Some(value) = StyleValue::from_json(value) else {
                    bail!("rule '{}': unsupported value {value}", self.property);
                };
                ShaderRule::constant(self.property.as_str(), value)
            }
            (None, Some(key)) => ShaderRule::attribute(self.property.as_str(), key.as_str()),
            _ => bail!(
                "rule '{}': exactly one of 'value' and 'attribute' is required",
                self.property
            ),
        };
        if self.min_zoom.is_some() || self.max_zoom.is_some() {
            Ok(rule.zoom_range(self.min_zoom, self.max_zoom))
        } else {
            Ok(rule)
        }
    }
}

fn shader(rules: &[RuleSpec]) -> Result<Shader> {
    rules
        .iter()
        .map(RuleSpec::to_rule)
        .collect::<Result<Vec<_>>>()
        .map(Shader::new)
}

/// Parse a scene from JSON text.
///
/// # Errors
///
/// Fails on malformed JSON or unknown keys.
pub fn parse(json: &str) -> Result<Scene> {
    serde_json::from_str(json).context("invalid scene file")
}

/// A scene turned into live objects.
pub struct LoadedScene {
    /// Layer-level context.
    pub layer: LayerContext,
    /// Sublayers with their bindings attached.
    pub sublayers: Vec<Sublayer>,
}

impl Scene {
    /// Build the layer context and sublayers.
    ///
    /// # Errors
    ///
    /// Fails on malformed rules, on a sublayer with both a server style and
    /// rules, and on sublayer or binding errors.
    pub fn load(self) -> Result<LoadedScene> {
        let mut layer = LayerContext::new(self.layer_url);
        layer.fill_images = self
            .fill_images
            .iter()
            .map(|image| Ok((image.symbol_id, image.to_bitmap()?)))
            .collect::<Result<_>>()?;

        let mut surfaces = 0_u32;
        let mut sublayers = Vec::with_capacity(self.sublayers.len());
        for spec in self.sublayers {
            let name = spec.name.clone();
            let sublayer = load_sublayer(spec, self.zoom, &mut surfaces)
                .with_context(|| format!("sublayer '{name}'"))?;
            sublayers.push(sublayer);
        }

        if let Some(highlight) = &self.highlight {
            layer.highlight = load_highlight(highlight, &sublayers)?;
        }
        Ok(LoadedScene { layer, sublayers })
    }
}

fn load_sublayer(spec: SublayerSpec, zoom: f64, surfaces: &mut u32) -> Result<Sublayer> {
    let source = match (spec.server_style, spec.rules) {
        (Some(_), Some(_)) => bail!("'serverStyle' and 'rules' are mutually exclusive"),
        (Some(server), None) => Some(StyleSource::Server(server)),
        (None, Some(rules)) => Some(StyleSource::Rules(shader(&rules)?)),
        (None, None) => None,
    };

    let mut sublayer = Sublayer::new(spec.name, None, spec.options);
    let mut next_handles = || {
        *surfaces += 2;
        SurfaceHandles::new(*surfaces - 1, *surfaces)
    };

    if spec.per_feature {
        for feature in spec.features {
            let feature = match &source {
                Some(StyleSource::Rules(rules)) => {
                    let style = resolve_carto_style(
                        feature.kind(),
                        &feature.attributes,
                        rules.rules(),
                        zoom,
                    );
                    feature.with_style(style)
                }
                Some(StyleSource::Server(_)) | None => feature,
            };
            let binding = SymbolizerBinding::single_feature(
                &sublayer,
                feature,
                source.clone(),
                next_handles(),
            )?;
            sublayer.add_symbolizer(binding)?;
        }
    } else {
        sublayer.add_features(spec.features)?;
        let binding = SymbolizerBinding::whole_sublayer(&sublayer, source, next_handles())?;
        sublayer.add_symbolizer(binding)?;
    }
    Ok(sublayer)
}

fn load_highlight(spec: &HighlightSpec, sublayers: &[Sublayer]) -> Result<HighlightContext> {
    if spec.sublayers.is_empty() && !spec.features.is_empty() {
        bail!("highlight 'features' need at least one listed sublayer");
    }
    let mut highlight = HighlightContext::new();
    let mut listed: Vec<FeatureId> = Vec::new();
    for name in &spec.sublayers {
        let Some(sublayer) = sublayers.iter().find(|s| s.layer_name().is_ok_and(|n| n == name)) else {
            bail!("highlight names unknown sublayer '{name}'");
        };
        let id = sublayer.id()?;
        if spec.features.is_empty() {
            highlight.push(id, None);
        } else {
            for &feature in &spec.features {
                highlight.push(id, Some(FeatureId(feature)));
            }
        }
        for feature in highlight.listed_features(id) {
            if !listed.contains(&feature) {
                listed.push(feature);
            }
        }
    }

    let mut shader = shader(&spec.rules).context("highlight rules")?;
    if !listed.is_empty() {
        let rules = shader.rules().iter().cloned().map(ShaderRule::filtered).collect();
        shader = Shader::new(rules).with_feature_filter(move |id| listed.contains(&id));
    }

    if spec.whole_layer {
        highlight.whole_layer_shader = Some(shader);
    } else {
        highlight.selector_shader = Some(shader);
    }
    Ok(highlight)
}
