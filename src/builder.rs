//! Fluent builder for pipeline configuration.
//!
//! This module provides a builder pattern for constructing pipeline
//! configurations in a clean, readable manner.
//!
//! # Quick Start
//!
//! ```
//! use event_forecaster::PipelineBuilder;
//!
//! // Defaults: top-15 categories, 7-day window, 2% held out, 365-day horizon
//! let pipeline = PipelineBuilder::new().build().unwrap();
//! assert_eq!(pipeline.config().encoder.top_k, 15);
//! ```
//!
//! # Common Configurations
//!
//! ```
//! use event_forecaster::PipelineBuilder;
//! use event_forecaster::forecast::PastEventPolicy;
//! use event_forecaster::preprocessing::MissingValuePolicy;
//!
//! let pipeline = PipelineBuilder::new()
//!     .top_k(10)
//!     .rolling_window(14)
//!     .missing_values(MissingValuePolicy::ForwardFill)
//!     .test_fraction(0.05)
//!     .past_event_policy(PastEventPolicy::Ignore)
//!     .experiment("gold_wars_v1", "Top-10 categories, forward fill")
//!     .build()
//!     .unwrap();
//! ```

use crate::config::{EncoderConfig, ExperimentMetadata, PipelineConfig};
use crate::error::{ForecastError, Result};
use crate::forecast::PastEventPolicy;
use crate::pipeline::Pipeline;
use crate::preprocessing::MissingValuePolicy;

/// Fluent builder for creating pipeline configurations.
///
/// Configuration is validated once, in [`PipelineBuilder::build_config`].
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    // =========================================================================
    // Encoding and features
    // =========================================================================

    /// Number of most frequent categories that get their own code.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.encoder = EncoderConfig { top_k: k };
        self
    }

    /// Trailing window for rolling means, in rows.
    pub fn rolling_window(mut self, window: usize) -> Self {
        self.config.features.rolling_window = window;
        self
    }

    /// Resolution of undefined feature values.
    pub fn missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.config.features.missing = policy;
        self
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Fraction of rows held out from the tail.
    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.config.training.test_fraction = fraction;
        self
    }

    /// Minimum rows in the training split.
    pub fn min_train_rows(mut self, rows: usize) -> Self {
        self.config.training.min_train_rows = rows;
        self
    }

    // =========================================================================
    // Forecasting
    // =========================================================================

    /// Upper bound for request horizons.
    pub fn max_horizon_days(mut self, days: u32) -> Self {
        self.config.forecast.max_horizon_days = days;
        self
    }

    pub fn past_event_policy(mut self, policy: PastEventPolicy) -> Self {
        self.config.forecast.past_event_policy = policy;
        self
    }

    /// Replace the category labels a request may name.
    pub fn allowed_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.forecast.allowed_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Longest calendar gap between prices before warning.
    pub fn max_gap_days(mut self, days: i64) -> Self {
        self.config.validation.max_gap_days = days;
        self
    }

    /// Treat record validation warnings as errors.
    pub fn strict_validation(mut self) -> Self {
        self.config.validation.strict = true;
        self
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Set experiment metadata for tracking and reproducibility.
    pub fn experiment(mut self, name: &str, description: &str) -> Self {
        self.config.metadata = Some(ExperimentMetadata::new(name).with_description(description));
        self
    }

    /// Set experiment metadata with full control.
    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.config.metadata = Some(metadata);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build_config(self) -> std::result::Result<PipelineConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build and return a ready-to-use Pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.build_config().map_err(ForecastError::Config)?;
        Pipeline::from_config(config)
    }

    /// Get a summary of the current configuration.
    pub fn summary(&self) -> String {
        let c = &self.config;
        format!(
            "PipelineBuilder Summary:\n\
             - Top-K categories: {}\n\
             - Rolling window: {} rows\n\
             - Missing values: {}\n\
             - Held-out fraction: {} (min {} training rows)\n\
             - Max horizon: {} days\n\
             - Past events: {:?}",
            c.encoder.top_k,
            c.features.rolling_window,
            c.features.missing.name(),
            c.training.test_fraction,
            c.training.min_train_rows,
            c.forecast.max_horizon_days,
            c.forecast.past_event_policy,
        )
    }
}
