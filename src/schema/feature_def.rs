//! Feature definitions and schema types.
//!
//! This module defines the core types for feature metadata:
//! - `FeatureCategory`: Kind of model input (lag, event indicator)
//! - `FeatureDef`: Metadata for a single column
//! - `FeatureSchema`: Ordered collection of column definitions

use super::{EVENT_TYPE_PREFIX, PRICE_LAG1};
use crate::encoding::OneHotEncoder;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureCategory {
    /// Price shifted back by a fixed number of days
    Lag,

    /// One-hot indicator of the encoded event type
    EventIndicator,
}

/// Definition of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDef {
    /// Unique column name (e.g., "price_lag1", "event_type_-1")
    pub name: String,

    /// Index in the feature vector
    pub index: usize,

    pub category: FeatureCategory,

    /// Human-readable description
    pub description: String,

    /// Encoded event code for indicator columns
    pub event_code: Option<i32>,
}

impl FeatureDef {
    /// Create a new feature definition.
    pub fn new(
        name: impl Into<String>,
        index: usize,
        category: FeatureCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            category,
            description: description.into(),
            event_code: None,
        }
    }

    /// Set the event code this column indicates.
    pub fn with_event_code(mut self, code: i32) -> Self {
        self.event_code = Some(code);
        self
    }
}

/// Ordered model-input schema.
///
/// Produced once at training time from the fitted one-hot encoder. Feature
/// vectors for the scaler and regression are laid out by this schema, so
/// training and forecasting agree on column order by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Schema version
    pub version: String,

    features: Vec<FeatureDef>,

    #[serde(skip)]
    name_index: HashMap<String, usize>,
}

impl PartialEq for FeatureSchema {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.features == other.features
    }
}

impl FeatureSchema {
    /// Create a new empty schema.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            features: Vec::new(),
            name_index: HashMap::new(),
        }
    }

    /// Regression inputs: `price_lag1` followed by one indicator per fitted
    /// event code.
    pub fn model_inputs(one_hot: &OneHotEncoder) -> Self {
        FeatureSchemaBuilder::new()
            .with_lag(1)
            .with_event_indicators(one_hot)
            .build()
    }

    /// Add a feature to the schema.
    pub fn add_feature(&mut self, feature: FeatureDef) {
        self.name_index.insert(feature.name.clone(), feature.index);
        self.features.push(feature);
    }

    /// Get the total number of features.
    pub fn total_count(&self) -> usize {
        self.features.len()
    }

    /// Column index of a name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// Get all features in a category.
    pub fn features_by_category(&self, category: FeatureCategory) -> Vec<&FeatureDef> {
        self.features
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }

    /// Get feature names in column order.
    pub fn feature_names(&self) -> Vec<&str> {
        let mut defs: Vec<&FeatureDef> = self.features.iter().collect();
        defs.sort_by_key(|f| f.index);
        defs.into_iter().map(|f| f.name.as_str()).collect()
    }

    /// All-zero vector of schema width.
    pub fn zeros(&self) -> Vec<f64> {
        vec![0.0; self.total_count()]
    }

    /// Write `value` into the named column of `vector`.
    pub fn set(&self, vector: &mut [f64], name: &str, value: f64) -> Result<()> {
        self.check_width(vector.len())?;
        let idx = self
            .index_of(name)
            .ok_or_else(|| ForecastError::UnknownFeature(name.to_string()))?;
        vector[idx] = value;
        Ok(())
    }

    /// Fail unless `len` equals the schema width.
    pub fn check_width(&self, len: usize) -> Result<()> {
        if len != self.total_count() {
            return Err(ForecastError::SchemaMismatch {
                expected: self.total_count(),
                actual: len,
            });
        }
        Ok(())
    }

    /// Rebuild internal indices (call after deserialization).
    pub fn rebuild_indices(&mut self) {
        self.name_index = self
            .features
            .iter()
            .map(|f| (f.name.clone(), f.index))
            .collect();
    }
}

/// Builder for model-input schemas.
pub struct FeatureSchemaBuilder {
    schema: FeatureSchema,
    next_index: usize,
}

impl Default for FeatureSchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureSchemaBuilder {
    /// Create a new schema builder.
    pub fn new() -> Self {
        Self {
            schema: FeatureSchema::new(super::SCHEMA_VERSION),
            next_index: 0,
        }
    }

    /// Add a price lag column for `lag` days back.
    pub fn with_lag(mut self, lag: usize) -> Self {
        let name = if lag == 1 {
            PRICE_LAG1.to_string()
        } else {
            format!("price_lag{lag}")
        };
        let feat = FeatureDef::new(
            name,
            self.next_index,
            FeatureCategory::Lag,
            format!("Price {lag} day(s) earlier"),
        );
        self.schema.add_feature(feat);
        self.next_index += 1;
        self
    }

    /// Add one indicator column per category of the fitted encoder.
    pub fn with_event_indicators(mut self, one_hot: &OneHotEncoder) -> Self {
        for &code in one_hot.categories() {
            let feat = FeatureDef::new(
                one_hot.column_name(code),
                self.next_index,
                FeatureCategory::EventIndicator,
                format!("1 when the day's {EVENT_TYPE_PREFIX} code is {code}"),
            )
            .with_event_code(code);
            self.schema.add_feature(feat);
            self.next_index += 1;
        }
        self
    }

    /// Build the final schema.
    pub fn build(mut self) -> FeatureSchema {
        self.schema.rebuild_indices();
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        let one_hot = OneHotEncoder::fit(EVENT_TYPE_PREFIX, [-1, 0, 1]);
        FeatureSchema::model_inputs(&one_hot)
    }

    #[test]
    fn test_indicators_carry_event_codes() {
        let codes: Vec<Option<i32>> = schema()
            .features_by_category(FeatureCategory::EventIndicator)
            .iter()
            .map(|f| f.event_code)
            .collect();
        assert_eq!(codes, vec![Some(-1), Some(0), Some(1)]);
    }

    #[test]
    fn test_feature_def_builder() {
        let feat = FeatureDef::new("event_type_3", 4, FeatureCategory::EventIndicator, "x")
            .with_event_code(3);
        assert_eq!(feat.event_code, Some(3));
        assert_eq!(feat.index, 4);
    }

    #[test]
    fn test_set_named_values() {
        let s = schema();
        let mut v = s.zeros();
        s.set(&mut v, "price_lag1", 1999.5).unwrap();
        s.set(&mut v, "event_type_0", 1.0).unwrap();
        assert_eq!(v, vec![1999.5, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unknown_column_is_error() {
        let s = schema();
        let mut v = s.zeros();
        let err = s.set(&mut v, "event_type_9", 1.0).unwrap_err();
        assert!(matches!(err, ForecastError::UnknownFeature(name) if name == "event_type_9"));
    }

    #[test]
    fn test_width_mismatch() {
        let s = schema();
        let mut short = vec![0.0; 2];
        let err = s.set(&mut short, "price_lag1", 1.0).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::SchemaMismatch {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_serde_roundtrip_rebuilds_lookup() {
        let s = schema();
        let json = serde_json::to_string(&s).unwrap();
        let mut back: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back.index_of("price_lag1"), None);
        back.rebuild_indices();
        assert_eq!(back, s);
        assert_eq!(back.index_of("event_type_1"), Some(3));
    }

    #[test]
    fn test_extra_lag_column_name() {
        let s = FeatureSchemaBuilder::new().with_lag(1).with_lag(2).build();
        assert_eq!(s.feature_names(), vec!["price_lag1", "price_lag2"]);
        assert_eq!(s.features_by_category(FeatureCategory::Lag).len(), 2);
        assert!(s.features_by_category(FeatureCategory::EventIndicator).is_empty());
    }
}
