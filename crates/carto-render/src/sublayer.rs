//! Sublayers: named groups of features with their own paint order.

use carto_common::error::CartoError;
use carto_common::warning::warn_once;
use carto_style::FeatureId;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::feature::Feature;
use crate::layer::RenderPass;
use crate::symbolizer::{SublayerTarget, SymbolizerBinding};

/// Paint order used for sublayers without an assigned origin index.
pub const UNASSIGNED_PAINT_ORDER: u32 = 999;

/// Replacement for characters that are not valid in ids and class names.
pub const ID_ESCAPE: &str = "__";

/// Paint-order index assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginIndex {
    /// An explicit index.
    Assigned(u32),
    /// No index; paints after every assigned sublayer.
    #[default]
    Unassigned,
}

impl OriginIndex {
    /// The paint-order tiebreak stamped onto features.
    #[must_use]
    pub const fn paint_order(self) -> u32 {
        match self {
            Self::Assigned(index) => index,
            Self::Unassigned => UNASSIGNED_PAINT_ORDER,
        }
    }
}

impl From<Option<u32>> for OriginIndex {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Self::Unassigned, Self::Assigned)
    }
}

/// Kind of user-generated-content layer a sublayer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UgcLayerType {
    /// A plain vector dataset.
    Vector,
    /// A thematic map layer.
    Theme,
}

/// The tile a sublayer was delivered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileKey {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
    /// Zoom level.
    pub z: u32,
}

/// Construction options of a sublayer. Unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SublayerOptions {
    /// Paint-order index assigned by the server.
    pub origin_index: Option<u32>,
    /// Whether `redraw` draws anything.
    pub visible: bool,
    /// Source layer kind.
    pub ugc_layer_type: Option<UgcLayerType>,
}

impl Default for SublayerOptions {
    fn default() -> Self {
        Self {
            origin_index: None,
            visible: true,
            ugc_layer_type: None,
        }
    }
}

#[derive(Debug, Default)]
struct SublayerData {
    features: Vec<Feature>,
    bindings: Vec<SymbolizerBinding>,
}

/// A named group of features and the bindings that draw them.
///
/// After [`Sublayer::destroy`] every operation except
/// [`Sublayer::is_destroyed`] fails with [`CartoError::IllegalState`].
#[derive(Debug)]
pub struct Sublayer {
    layer_name: String,
    id: String,
    css_class: String,
    index: f64,
    origin_index: OriginIndex,
    tile: Option<TileKey>,
    ugc_layer_type: Option<UgcLayerType>,
    visible: bool,
    data: Option<SublayerData>,
}

/// Derive an id or class name from a layer name: every `@` and `#` becomes
/// [`ID_ESCAPE`].
#[must_use]
pub fn escape_layer_name(name: &str) -> String {
    name.replace(['@', '#'], ID_ESCAPE)
}

fn destroyed(id: &str) -> CartoError {
    CartoError::illegal_state(format!("sublayer '{id}' was destroyed"))
}

impl Sublayer {
    /// Create a sublayer named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, tile: Option<TileKey>, options: SublayerOptions) -> Self {
        let layer_name = name.into();
        let id = escape_layer_name(&layer_name);
        Self {
            css_class: id.clone(),
            id,
            layer_name,
            index: 0.0,
            origin_index: options.origin_index.into(),
            tile,
            ugc_layer_type: options.ugc_layer_type,
            visible: options.visible,
            data: Some(SublayerData::default()),
        }
    }

    /// The layer name as delivered.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn layer_name(&self) -> Result<&str, CartoError> {
        let _ = self.data()?;
        Ok(&self.layer_name)
    }

    /// Id derived from the layer name.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn id(&self) -> Result<&str, CartoError> {
        let _ = self.data()?;
        Ok(&self.id)
    }

    /// Class name derived from the layer name.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn css_class(&self) -> Result<&str, CartoError> {
        let _ = self.data()?;
        Ok(&self.css_class)
    }

    /// Client-side ordering index.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn index(&self) -> Result<f64, CartoError> {
        let _ = self.data()?;
        Ok(self.index)
    }

    /// Server-assigned paint order.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn origin_index(&self) -> Result<OriginIndex, CartoError> {
        let _ = self.data()?;
        Ok(self.origin_index)
    }

    /// Owning tile, if known.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn tile(&self) -> Result<Option<TileKey>, CartoError> {
        let _ = self.data()?;
        Ok(self.tile)
    }

    /// Source layer kind, if known.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn ugc_layer_type(&self) -> Result<Option<UgcLayerType>, CartoError> {
        let _ = self.data()?;
        Ok(self.ugc_layer_type)
    }

    /// Whether `redraw` draws anything.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn is_visible(&self) -> Result<bool, CartoError> {
        let _ = self.data()?;
        Ok(self.visible)
    }

    /// Whether [`Sublayer::destroy`] was called.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.data.is_none()
    }

    fn data(&self) -> Result<&SublayerData, CartoError> {
        self.data.as_ref().ok_or_else(|| destroyed(&self.id))
    }

    fn data_mut(&mut self) -> Result<&mut SublayerData, CartoError> {
        let id = &self.id;
        self.data.as_mut().ok_or_else(|| destroyed(id))
    }

    /// Show or hide the sublayer.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn set_visible(&mut self, visible: bool) -> Result<(), CartoError> {
        let _ = self.data()?;
        self.visible = visible;
        Ok(())
    }

    /// The features, in insertion order.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn features(&self) -> Result<&[Feature], CartoError> {
        Ok(&self.data()?.features)
    }

    /// The bindings, in insertion order.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn symbolizers(&self) -> Result<&[SymbolizerBinding], CartoError> {
        Ok(&self.data()?.bindings)
    }

    /// Append a feature.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn add_feature(&mut self, feature: Feature) -> Result<(), CartoError> {
        self.data_mut()?.features.push(feature);
        Ok(())
    }

    /// Append features in order.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn add_features<I>(&mut self, features: I) -> Result<(), CartoError>
    where
        I: IntoIterator<Item = Feature>,
    {
        self.data_mut()?.features.extend(features);
        Ok(())
    }

    /// The first feature with id `id`.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn feature_by_id(&self, id: FeatureId) -> Result<Option<&Feature>, CartoError> {
        Ok(self.data()?.features.iter().find(|feature| feature.id == id))
    }

    /// Append a binding created for this sublayer.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed, or when the binding
    /// belongs to another sublayer.
    pub fn add_symbolizer(&mut self, binding: SymbolizerBinding) -> Result<(), CartoError> {
        if binding.sublayer_id() != self.id {
            return Err(CartoError::illegal_state(format!(
                "symbolizer of sublayer '{}' added to sublayer '{}'",
                binding.sublayer_id(),
                self.id
            )));
        }
        self.data_mut()?.bindings.push(binding);
        Ok(())
    }

    /// Append bindings in order; stops at the first rejected one.
    ///
    /// # Errors
    ///
    /// As [`Sublayer::add_symbolizer`].
    pub fn add_symbolizers<I>(&mut self, bindings: I) -> Result<(), CartoError>
    where
        I: IntoIterator<Item = SymbolizerBinding>,
    {
        bindings
            .into_iter()
            .try_for_each(|binding| self.add_symbolizer(binding))
    }

    /// Set the ordering index; NaN is ignored.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn set_index(&mut self, index: f64) -> Result<(), CartoError> {
        let _ = self.data()?;
        if index.is_nan() {
            warn_once("Sublayer", &format!("'{}': NaN index ignored", self.id));
        } else {
            self.index = index;
        }
        Ok(())
    }

    /// Set the ordering index from server text; unparsable input is ignored.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed.
    pub fn set_index_str(&mut self, raw: &str) -> Result<(), CartoError> {
        let _ = self.data()?;
        match raw.trim().parse::<f64>() {
            Ok(index) => self.set_index(index),
            Err(_) => {
                warn_once(
                    "Sublayer",
                    &format!("'{}': index '{raw}' is not a number; ignored", self.id),
                );
                Ok(())
            }
        }
    }

    /// Whether both sublayers have the same layer name, id and class name.
    /// Features and bindings are not compared.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] if either sublayer was destroyed.
    pub fn equals(&self, other: &Self) -> Result<bool, CartoError> {
        let _ = self.data()?;
        let _ = other.data()?;
        Ok(self.layer_name == other.layer_name
            && self.id == other.id
            && self.css_class == other.css_class)
    }

    /// Run every binding in insertion order. Does nothing while hidden.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] once destroyed; the first error of a
    /// binding stops the redraw.
    pub fn redraw(&mut self, pass: &mut RenderPass<'_>) -> Result<(), CartoError> {
        let visible = self.visible;
        let origin_index = self.origin_index;
        let Some(data) = self.data.as_mut() else {
            return Err(destroyed(&self.id));
        };
        if !visible {
            return Ok(());
        }
        let SublayerData { features, bindings } = data;
        for binding in bindings.iter_mut() {
            let target = SublayerTarget {
                id: &self.id,
                origin_index,
                features: features.as_mut_slice(),
            };
            binding.render(target, pass)?;
        }
        Ok(())
    }

    /// Destroy the bindings and drop the features.
    ///
    /// # Errors
    ///
    /// [`CartoError::IllegalState`] if already destroyed.
    pub fn destroy(&mut self) -> Result<(), CartoError> {
        let Some(mut data) = self.data.take() else {
            return Err(destroyed(&self.id));
        };
        self.visible = false;
        for binding in &mut data.bindings {
            binding.destroy()?;
        }
        Ok(())
    }
}

/// Destroyed sublayers compare unequal to everything, themselves included.
impl PartialEq for Sublayer {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.equals(other), Ok(true))
    }
}
