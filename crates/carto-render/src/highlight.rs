//! Highlight state of the owning layer.

use carto_style::{FeatureId, Shader};

/// One entry of the highlight index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightInfo {
    /// Id of the sublayer the highlighted feature belongs to.
    pub sublayer_id: String,
    /// The highlighted feature, when the entry names one.
    pub feature_id: Option<FeatureId>,
}

/// Highlight index and shaders of a layer.
///
/// The selector shader applies to sublayers named in the index; the
/// whole-layer shader applies everywhere. When a highlight applies and both
/// are set, the selector shader wins.
#[derive(Debug, Clone, Default)]
pub struct HighlightContext {
    /// Highlight index, oldest entry first.
    pub infos: Vec<HighlightInfo>,
    /// Shader for sublayers named in the index.
    pub selector_shader: Option<Shader>,
    /// Shader for every sublayer of the layer.
    pub whole_layer_shader: Option<Shader>,
}

impl HighlightContext {
    /// No highlight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an index entry.
    pub fn push(&mut self, sublayer_id: impl Into<String>, feature_id: Option<FeatureId>) {
        self.infos.push(HighlightInfo {
            sublayer_id: sublayer_id.into(),
            feature_id,
        });
    }

    /// Whether the index names `sublayer_id`. Newest entries are checked first.
    #[must_use]
    pub fn is_listed(&self, sublayer_id: &str) -> bool {
        self.infos
            .iter()
            .rev()
            .any(|info| info.sublayer_id == sublayer_id)
    }

    /// Features of `sublayer_id` named by the index.
    pub fn listed_features<'a>(
        &'a self,
        sublayer_id: &'a str,
    ) -> impl Iterator<Item = FeatureId> + 'a {
        self.infos
            .iter()
            .filter(move |info| info.sublayer_id == sublayer_id)
            .filter_map(|info| info.feature_id)
    }

    /// The shader to overlay on features of `sublayer_id`, if any.
    #[must_use]
    pub fn shader_for(&self, sublayer_id: &str) -> Option<&Shader> {
        let selected = self.selector_shader.is_some() && self.is_listed(sublayer_id);
        if selected || self.whole_layer_shader.is_some() {
            self.selector_shader.as_ref().or(self.whole_layer_shader.as_ref())
        } else {
            None
        }
    }
}
