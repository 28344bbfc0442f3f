//! Symbolizer bindings: resolve a style per feature and dispatch the draw.
//!
//! A binding belongs to one sublayer and either covers all of its features
//! or a single feature of its own. Rendering runs in a fixed order: rebind
//! the backend surfaces, read the zoom, resolve the base style, apply the
//! highlight overlay when one applies, stamp the paint order, draw.

use carto_common::error::CartoError;
use carto_style::{
    Attributes, CanonicalStyle, FEATURE_ID_ATTRIBUTE, GeometryKind, ServerStyle,
    ServerStyleContext, ServerStyleSource, Shader, overlay_highlight, resolve_carto_style,
    resolve_defaults, resolve_from_server_style,
};
use serde_json::Value;
use strum_macros::Display;

use crate::backend::SurfaceHandles;
use crate::feature::{Feature, RenderClass};
use crate::highlight::HighlightContext;
use crate::layer::RenderPass;
use crate::sublayer::{OriginIndex, Sublayer};

/// What a binding renders.
#[derive(Debug, Clone)]
pub enum BindingMode {
    /// Every feature of the sublayer.
    WholeSublayer,
    /// One feature owned by the binding.
    SingleFeature(Box<Feature>),
}

/// Where a binding takes its base style from.
#[derive(Debug, Clone)]
pub enum StyleSource {
    /// CartoCSS shader rules.
    Rules(Shader),
    /// A style delivered by the map service.
    Server(ServerStyle),
}

/// Lifecycle state of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BindingState {
    /// Ready to render.
    Bound,
    /// Inside `render`.
    Rendering,
    /// Released; every further call fails.
    Destroyed,
}

/// The parts of a sublayer a binding renders against.
pub struct SublayerTarget<'a> {
    /// Id of the sublayer.
    pub id: &'a str,
    /// Paint-order index of the sublayer.
    pub origin_index: OriginIndex,
    /// Features of the sublayer.
    pub features: &'a mut [Feature],
}

/// Binds a style source and drawing surfaces to a sublayer.
#[derive(Debug, Clone)]
pub struct SymbolizerBinding {
    sublayer_id: String,
    mode: BindingMode,
    source: Option<StyleSource>,
    handles: Option<SurfaceHandles>,
    state: BindingState,
}

impl SymbolizerBinding {
    /// A binding over every feature of `sublayer`.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] if `sublayer` was destroyed.
    pub fn whole_sublayer(
        sublayer: &Sublayer,
        source: Option<StyleSource>,
        handles: SurfaceHandles,
    ) -> Result<Self, CartoError> {
        Self::bind(sublayer, BindingMode::WholeSublayer, source, handles)
    }

    /// A binding that renders `feature` on behalf of `sublayer`.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] if `sublayer` was destroyed.
    pub fn single_feature(
        sublayer: &Sublayer,
        feature: Feature,
        source: Option<StyleSource>,
        handles: SurfaceHandles,
    ) -> Result<Self, CartoError> {
        let mode = BindingMode::SingleFeature(Box::new(feature));
        Self::bind(sublayer, mode, source, handles)
    }

    fn bind(
        sublayer: &Sublayer,
        mode: BindingMode,
        source: Option<StyleSource>,
        handles: SurfaceHandles,
    ) -> Result<Self, CartoError> {
        let sublayer_id = sublayer.id()?.to_string();
        Ok(Self {
            sublayer_id,
            mode,
            source,
            handles: Some(handles),
            state: BindingState::Bound,
        })
    }

    /// Id of the sublayer the binding belongs to.
    #[must_use]
    pub fn sublayer_id(&self) -> &str {
        &self.sublayer_id
    }

    /// What the binding renders.
    #[must_use]
    pub const fn mode(&self) -> &BindingMode {
        &self.mode
    }

    /// The style source, `None` once destroyed or when none was given.
    #[must_use]
    pub const fn source(&self) -> Option<&StyleSource> {
        self.source.as_ref()
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BindingState {
        self.state
    }

    /// Whether the highlight index names this binding's sublayer.
    #[must_use]
    pub fn check_highlight_applicability(&self, highlight: &HighlightContext) -> bool {
        highlight.is_listed(&self.sublayer_id)
    }

    /// Render into `pass.backend`.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed; [`CartoError::Render`]
    /// when a feature's style cannot be resolved. A failing feature aborts
    /// the rest of the pass.
    pub fn render(
        &mut self,
        mut target: SublayerTarget<'_>,
        pass: &mut RenderPass<'_>,
    ) -> Result<(), CartoError> {
        let (BindingState::Bound, Some(handles)) = (self.state, self.handles) else {
            return Err(CartoError::illegal_state(format!(
                "symbolizer of sublayer '{}' is {}",
                self.sublayer_id, self.state
            )));
        };

        pass.backend.bind_surfaces(handles);
        self.state = BindingState::Rendering;
        let result = self.dispatch(&mut target, pass);
        self.state = BindingState::Bound;
        result
    }

    fn dispatch(
        &mut self,
        target: &mut SublayerTarget<'_>,
        pass: &mut RenderPass<'_>,
    ) -> Result<(), CartoError> {
        let zoom = pass.map.zoom();
        let layer = pass.layer;
        let highlight = layer.highlight.shader_for(&self.sublayer_id);
        let server_ctx = layer.server_context();
        let paint_order = target.origin_index.paint_order();

        match &mut self.mode {
            BindingMode::WholeSublayer => {
                if target.features.is_empty() {
                    return Ok(());
                }
                for feature in target.features.iter_mut() {
                    let attributes = with_feature_id(feature);
                    let base =
                        base_style(self.source.as_ref(), feature, &attributes, zoom, &server_ctx)?;
                    let style = if let Some(shader) = highlight {
                        feature.render_class = RenderClass::Highlight;
                        highlighted(&base, feature, &attributes, shader, zoom)
                    } else {
                        feature.render_class = RenderClass::Normal;
                        base
                    };
                    draw(pass, target.id, feature, paint_order, &style);
                }
            }
            BindingMode::SingleFeature(feature) => {
                let attributes = with_feature_id(feature);
                let style = if let Some(shader) = highlight {
                    feature.render_class = RenderClass::Highlight;
                    let cached = feature.style.clone().unwrap_or_default();
                    highlighted(&cached, feature, &attributes, shader, zoom)
                } else {
                    feature.render_class = RenderClass::Normal;
                    match &self.source {
                        Some(StyleSource::Server(server)) => {
                            let source = server_source(feature, server);
                            resolve_from_server_style(feature.kind(), source, &server_ctx)?
                        }
                        Some(StyleSource::Rules(_)) | None => {
                            feature.style.clone().unwrap_or_else(|| {
                                resolve_defaults(feature.kind(), &CanonicalStyle::new())
                            })
                        }
                    }
                };
                draw(pass, target.id, feature, paint_order, &style);
            }
        }
        Ok(())
    }

    /// Release the style source, surfaces and owned feature.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] if already destroyed.
    pub fn destroy(&mut self) -> Result<(), CartoError> {
        if self.state == BindingState::Destroyed {
            return Err(CartoError::illegal_state(format!(
                "symbolizer of sublayer '{}' destroyed twice",
                self.sublayer_id
            )));
        }
        self.source = None;
        self.handles = None;
        self.mode = BindingMode::WholeSublayer;
        self.state = BindingState::Destroyed;
        Ok(())
    }
}

/// Attributes of `feature` with its id exposed under [`FEATURE_ID_ATTRIBUTE`].
fn with_feature_id(feature: &Feature) -> Attributes {
    let mut attributes = feature.attributes.clone();
    let _ = attributes.insert(FEATURE_ID_ATTRIBUTE.to_string(), Value::from(feature.id.0));
    attributes
}

/// TEXT features use their own text style; everything else the shared style.
fn server_source<'a>(feature: &'a Feature, server: &'a ServerStyle) -> ServerStyleSource<'a> {
    match (&feature.geometry.text_style, feature.kind()) {
        (Some(text), GeometryKind::Text) => ServerStyleSource::Text(text),
        _ => ServerStyleSource::Style(server),
    }
}

fn base_style(
    source: Option<&StyleSource>,
    feature: &Feature,
    attributes: &Attributes,
    zoom: f64,
    server_ctx: &ServerStyleContext<'_>,
) -> Result<CanonicalStyle, CartoError> {
    let kind = feature.kind();
    Ok(match source {
        Some(StyleSource::Rules(shader)) => {
            resolve_carto_style(kind, attributes, shader.rules(), zoom)
        }
        Some(StyleSource::Server(server)) => {
            resolve_from_server_style(kind, server_source(feature, server), server_ctx)?
        }
        None => resolve_carto_style(kind, attributes, &[], zoom),
    })
}

fn highlighted(
    base: &CanonicalStyle,
    feature: &Feature,
    attributes: &Attributes,
    shader: &Shader,
    zoom: f64,
) -> CanonicalStyle {
    let filter = shader.filter_for(feature.id);
    overlay_highlight(base, feature.kind(), attributes, shader, zoom, filter)
}

fn draw(
    pass: &mut RenderPass<'_>,
    sublayer_id: &str,
    feature: &mut Feature,
    paint_order: u32,
    style: &CanonicalStyle,
) {
    feature.layer_index = Some(paint_order);
    #[cfg(feature = "render-trace")]
    eprintln!(
        "[render] sublayer={sublayer_id} feature={} kind={} class={} order={paint_order} props={}",
        feature.id,
        feature.kind(),
        feature.render_class,
        style.len()
    );
    #[cfg(not(feature = "render-trace"))]
    let _ = sublayer_id;
    pass.backend.draw_feature(feature, style);
}
