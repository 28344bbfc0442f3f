//! Shader rules: the output contract of the CartoCSS rule matcher.
//!
//! A shader is an ordered list of `(property, evaluator)` rules. The parser
//! and matcher that produce them live outside this crate; the helpers on
//! [`ShaderRule`] cover constant values, attribute lookups and zoom ranges,
//! which is what scene files and tests need.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde_json::{Map, Value};

use crate::geometry::{FeatureId, GeometryKind};
use crate::value::StyleValue;

/// Feature attributes as delivered by the map service.
pub type Attributes = Map<String, Value>;

/// Attribute key under which the render pass exposes the feature id.
pub const FEATURE_ID_ATTRIBUTE: &str = "featureID";

/// Evaluates one rule for one feature.
///
/// `filter` is the outcome of the shader's feature filter for the feature
/// being styled, or `None` when no filter applies.
pub trait ValueEvaluator {
    /// Value of the rule, or `None` when the rule does not apply.
    fn evaluate(&self, attributes: &Attributes, zoom: f64, filter: Option<bool>)
    -> Option<StyleValue>;
}

impl<F> ValueEvaluator for F
where
    F: Fn(&Attributes, f64, Option<bool>) -> Option<StyleValue>,
{
    fn evaluate(
        &self,
        attributes: &Attributes,
        zoom: f64,
        filter: Option<bool>,
    ) -> Option<StyleValue> {
        self(attributes, zoom, filter)
    }
}

type SharedEvaluator = Arc<dyn ValueEvaluator + Send + Sync>;

/// One `(CartoCSS property, evaluator)` pair.
#[derive(Clone)]
pub struct ShaderRule {
    property: String,
    evaluator: SharedEvaluator,
    /// One bit per geometry kind the property was found unmapped for.
    unmapped: Arc<AtomicU8>,
}

impl ShaderRule {
    /// A rule backed by an arbitrary evaluator.
    pub fn new<E>(property: impl Into<String>, evaluator: E) -> Self
    where
        E: ValueEvaluator + Send + Sync + 'static,
    {
        Self {
            property: property.into(),
            evaluator: Arc::new(evaluator),
            unmapped: Arc::new(AtomicU8::new(0)),
        }
    }

    /// A rule that always yields `value`.
    pub fn constant(property: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        let value = value.into();
        Self::new(property, move |_: &Attributes, _: f64, _: Option<bool>| {
            Some(value.clone())
        })
    }

    /// A rule that reads its value from a feature attribute.
    pub fn attribute(property: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(
            property,
            move |attributes: &Attributes, _: f64, _: Option<bool>| {
                attributes.get(&key).and_then(StyleValue::from_json)
            },
        )
    }

    /// Restrict the rule to zoom levels in `min..=max` (either bound optional).
    #[must_use]
    pub fn zoom_range(self, min: Option<f64>, max: Option<f64>) -> Self {
        let inner = self.evaluator;
        Self::new(
            self.property,
            move |attributes: &Attributes, zoom: f64, filter: Option<bool>| {
                let above = min.is_none_or(|min| zoom >= min);
                let below = max.is_none_or(|max| zoom <= max);
                if above && below {
                    inner.evaluate(attributes, zoom, filter)
                } else {
                    None
                }
            },
        )
    }

    /// Skip the rule for features the shader's filter rejected.
    #[must_use]
    pub fn filtered(self) -> Self {
        let inner = self.evaluator;
        Self::new(
            self.property,
            move |attributes: &Attributes, zoom: f64, filter: Option<bool>| {
                if filter == Some(false) {
                    None
                } else {
                    inner.evaluate(attributes, zoom, filter)
                }
            },
        )
    }

    /// The CartoCSS property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Record that the property has no mapping for `kind`.
    ///
    /// Returns `true` only the first time for each kind; clones share the
    /// record.
    #[must_use]
    pub fn mark_unmapped(&self, kind: GeometryKind) -> bool {
        let bit = 1_u8 << (kind as u8);
        (self.unmapped.fetch_or(bit, Ordering::Relaxed) & bit) == 0
    }

    /// Evaluate the rule.
    #[must_use]
    pub fn evaluate(
        &self,
        attributes: &Attributes,
        zoom: f64,
        filter: Option<bool>,
    ) -> Option<StyleValue> {
        self.evaluator.evaluate(attributes, zoom, filter)
    }
}

impl fmt::Debug for ShaderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderRule")
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

type SharedFilter = Arc<dyn Fn(FeatureId) -> bool + Send + Sync>;

/// An ordered rule list with an optional per-feature filter.
#[derive(Clone, Default)]
pub struct Shader {
    rules: Vec<ShaderRule>,
    feature_filter: Option<SharedFilter>,
}

impl Shader {
    /// A shader over the given rules, without a feature filter.
    #[must_use]
    pub const fn new(rules: Vec<ShaderRule>) -> Self {
        Self {
            rules,
            feature_filter: None,
        }
    }

    /// Attach a feature filter predicate.
    #[must_use]
    pub fn with_feature_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(FeatureId) -> bool + Send + Sync + 'static,
    {
        self.feature_filter = Some(Arc::new(filter));
        self
    }

    /// Append a rule.
    pub fn push(&mut self, rule: ShaderRule) {
        self.rules.push(rule);
    }

    /// The rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ShaderRule] {
        &self.rules
    }

    /// Whether the shader has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Outcome of the feature filter for `id`, `None` without a filter.
    #[must_use]
    pub fn filter_for(&self, id: FeatureId) -> Option<bool> {
        self.feature_filter.as_ref().map(|filter| filter(id))
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("rules", &self.rules)
            .field("feature_filter", &self.feature_filter.is_some())
            .finish()
    }
}

impl FromIterator<ShaderRule> for Shader {
    fn from_iter<I: IntoIterator<Item = ShaderRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
