//! Feature Schema Module
//!
//! Named, ordered model-input columns, fixed once at training time and
//! threaded through to inference.
//!
//! # Design Philosophy
//!
//! - **Named**: Forecast-time vectors are assembled by column name, never
//!   by incidental position
//! - **Frozen**: The one-hot columns come from the encoder fitted on
//!   training data; inference cannot add or reorder them
//! - **Versioned**: The schema carries a version for experiment records
//!
//! # Example
//!
//! ```
//! use event_forecaster::encoding::OneHotEncoder;
//! use event_forecaster::schema::FeatureSchema;
//!
//! let one_hot = OneHotEncoder::fit("event_type", [-1, 0, 1]);
//! let schema = FeatureSchema::model_inputs(&one_hot);
//! assert_eq!(schema.total_count(), 4);
//! assert_eq!(schema.index_of("price_lag1"), Some(0));
//! assert_eq!(schema.index_of("event_type_1"), Some(3));
//! ```

mod feature_def;

pub use feature_def::{FeatureCategory, FeatureDef, FeatureSchema, FeatureSchemaBuilder};

/// Current schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Name of the lag-1 price column.
pub const PRICE_LAG1: &str = "price_lag1";

/// Prefix of the one-hot event columns.
pub const EVENT_TYPE_PREFIX: &str = "event_type";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::OneHotEncoder;

    #[test]
    fn test_schema_version() {
        assert!(!SCHEMA_VERSION.is_empty());
    }

    #[test]
    fn test_model_inputs_layout() {
        let one_hot = OneHotEncoder::fit(EVENT_TYPE_PREFIX, [2, -1, 0]);
        let schema = FeatureSchema::model_inputs(&one_hot);

        assert_eq!(
            schema.feature_names(),
            vec!["price_lag1", "event_type_-1", "event_type_0", "event_type_2"]
        );
        let indices: Vec<usize> = schema
            .features_by_category(FeatureCategory::EventIndicator)
            .iter()
            .map(|f| f.index)
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_feature_category_slice() {
        let one_hot = OneHotEncoder::fit(EVENT_TYPE_PREFIX, [-1, 0, 1, 2, 3]);
        let schema = FeatureSchema::model_inputs(&one_hot);
        let indicators = schema.features_by_category(FeatureCategory::EventIndicator);
        assert_eq!(indicators.len(), 5);
    }
}
