//! The canonical style record handed to the drawing backend.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

use crate::property::CanvasProperty;
use crate::value::StyleValue;

/// A resolved drawing style: canonical property name to value.
///
/// The same type holds partial results (rule output before defaulting,
/// highlight overlays) and complete styles. Iteration order is the
/// declaration order of [`CanvasProperty`], so two equal styles always
/// serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalStyle {
    values: BTreeMap<CanvasProperty, StyleValue>,
}

impl CanonicalStyle {
    /// An empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Value of a property, if set.
    #[must_use]
    pub fn get(&self, property: CanvasProperty) -> Option<&StyleValue> {
        self.values.get(&property)
    }

    /// Numeric value of a property, if set and numeric.
    #[must_use]
    pub fn number(&self, property: CanvasProperty) -> Option<f64> {
        self.get(property).and_then(StyleValue::as_number)
    }

    /// Text value of a property, if set and textual.
    #[must_use]
    pub fn text(&self, property: CanvasProperty) -> Option<&str> {
        self.get(property).and_then(StyleValue::as_text)
    }

    /// Whether a property is set.
    #[must_use]
    pub fn contains(&self, property: CanvasProperty) -> bool {
        self.values.contains_key(&property)
    }

    /// Set a property, replacing any earlier value.
    pub fn set(&mut self, property: CanvasProperty, value: impl Into<StyleValue>) {
        let _ = self.values.insert(property, value.into());
    }

    /// Builder form of [`CanonicalStyle::set`].
    #[must_use]
    pub fn with(mut self, property: CanvasProperty, value: impl Into<StyleValue>) -> Self {
        self.set(property, value);
        self
    }

    /// Number of properties set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(property, value)` pairs in canonical order.
    pub fn iter(&self) -> btree_map::Iter<'_, CanvasProperty, StyleValue> {
        self.values.iter()
    }

    /// A new style with every property of `overlay` written over `self`.
    ///
    /// Properties `overlay` does not set keep their value from `self`;
    /// neither input is modified.
    #[must_use]
    pub fn merged_with(&self, overlay: &Self) -> Self {
        let mut merged = self.clone();
        for (property, value) in overlay {
            merged.set(*property, value.clone());
        }
        merged
    }
}

impl<'a> IntoIterator for &'a CanonicalStyle {
    type Item = (&'a CanvasProperty, &'a StyleValue);
    type IntoIter = btree_map::Iter<'a, CanvasProperty, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl FromIterator<(CanvasProperty, StyleValue)> for CanonicalStyle {
    fn from_iter<I: IntoIterator<Item = (CanvasProperty, StyleValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
