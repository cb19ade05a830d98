//! Pipeline configuration management.
//!
//! This module provides unified configuration for the whole forecasting
//! pipeline (encoding, feature building, training, forecasting and record
//! validation), with serialization support for experiment reproducibility.
//!
//! # Features
//!
//! - **Unified Configuration**: Single struct combining all pipeline stages
//! - **Serialization**: Save/load configurations to TOML or JSON
//! - **Validation**: Ensure configurations are valid before use
//!
//! # Example
//!
//! ```no_run
//! use event_forecaster::config::PipelineConfig;
//! use event_forecaster::pipeline::Pipeline;
//!
//! # fn main() -> event_forecaster::Result<()> {
//! let config = PipelineConfig::default();
//! config.save_toml("experiment_config.toml")?;
//!
//! let loaded = PipelineConfig::load_toml("experiment_config.toml")?;
//! let pipeline = Pipeline::from_config(loaded)?;
//! # Ok(())
//! # }
//! ```

use crate::encoding::{DEFAULT_TOP_K, MAX_TOP_K};
use crate::error::{ForecastError, Result};
use crate::features::FeatureConfig;
use crate::forecast::ForecastConfig;
use crate::trainer::TrainingConfig;
use crate::validation::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Unified pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Event category encoding
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Feature building
    #[serde(default)]
    pub features: FeatureConfig,

    /// Train/held-out split and regression
    #[serde(default)]
    pub training: TrainingConfig,

    /// Request bounds and past-event handling
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Record validation
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Experiment metadata (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExperimentMetadata>,
}

/// Event encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Number of most frequent categories that get their own code
    pub top_k: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Experiment metadata for tracking and reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    /// Experiment name
    pub name: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Version or git commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Custom tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ExperimentMetadata {
    /// Metadata stamped with the current UTC time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            tags: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderConfig::default(),
            features: FeatureConfig::default(),
            training: TrainingConfig::default(),
            forecast: ForecastConfig::default(),
            validation: ValidationConfig::default(),
            metadata: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_encoder(mut self, config: EncoderConfig) -> Self {
        self.encoder = config;
        self
    }

    pub fn with_features(mut self, config: FeatureConfig) -> Self {
        self.features = config;
        self
    }

    pub fn with_training(mut self, config: TrainingConfig) -> Self {
        self.training = config;
        self
    }

    pub fn with_forecast(mut self, config: ForecastConfig) -> Self {
        self.forecast = config;
        self
    }

    pub fn with_validation(mut self, config: ValidationConfig) -> Self {
        self.validation = config;
        self
    }

    /// Validate the configuration.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.encoder.top_k == 0 || self.encoder.top_k > MAX_TOP_K {
            return Err(format!(
                "encoder.top_k must be in [1, {MAX_TOP_K}], got {}",
                self.encoder.top_k
            ));
        }
        self.features.validate()?;
        self.training.validate()?;
        self.forecast.validate()?;
        self.validation.validate()?;
        Ok(())
    }

    /// Save configuration to TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load configuration from TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&contents)?;
        config.validate().map_err(ForecastError::Config)?;
        Ok(config)
    }

    /// Save configuration to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load configuration from JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate().map_err(ForecastError::Config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::PastEventPolicy;
    use crate::preprocessing::MissingValuePolicy;
    use tempfile::tempdir;

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.encoder.top_k, 15);
        assert_eq!(config.features.rolling_window, 7);
        assert_eq!(config.training.test_fraction, 0.02);
        assert_eq!(config.forecast.max_horizon_days, 365);
    }

    #[test]
    fn test_save_load_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = PipelineConfig::default()
            .with_features(FeatureConfig::default().with_missing(MissingValuePolicy::ForwardFill))
            .with_forecast(ForecastConfig::default().with_past_event_policy(PastEventPolicy::Ignore))
            .with_metadata(
                ExperimentMetadata::new("gold_events")
                    .with_description("Test configuration")
                    .with_tags(["test"]),
            );

        config.save_toml(&path).unwrap();
        let loaded = PipelineConfig::load_toml(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = PipelineConfig::default().with_encoder(EncoderConfig { top_k: 5 });
        config.save_json(&path).unwrap();
        let loaded = PipelineConfig::load_json(&path).unwrap();

        assert_eq!(loaded.encoder.top_k, 5);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[encoder]\ntop_k = 3\n").unwrap();

        let loaded = PipelineConfig::load_toml(&path).unwrap();
        assert_eq!(loaded.encoder.top_k, 3);
        assert_eq!(loaded.training, TrainingConfig::default());
    }

    #[test]
    fn test_partial_sections_use_field_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sections.toml");
        fs::write(
            &path,
            "[training]\nmin_train_rows = 30\n\n[features]\nmissing = \"drop\"\n\n[forecast]\nmax_horizon_days = 90\n",
        )
        .unwrap();

        let loaded = PipelineConfig::load_toml(&path).unwrap();
        assert_eq!(loaded.training.min_train_rows, 30);
        assert_eq!(loaded.training.test_fraction, 0.02);
        assert_eq!(loaded.features.missing, MissingValuePolicy::Drop);
        assert_eq!(loaded.features.rolling_window, 7);
        assert_eq!(loaded.forecast.max_horizon_days, 90);
        assert_eq!(loaded.forecast.allowed_categories, ForecastConfig::default().allowed_categories);
    }

    #[test]
    fn test_top_k_upper_bound() {
        let config = PipelineConfig::default().with_encoder(EncoderConfig {
            top_k: MAX_TOP_K + 1,
        });
        assert!(config.validate().unwrap_err().contains("encoder.top_k"));
        let config = PipelineConfig::default().with_encoder(EncoderConfig { top_k: MAX_TOP_K });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[encoder]\ntop_k = 0\n").unwrap();

        let err = PipelineConfig::load_toml(&path).unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[encoder\n").unwrap();

        assert!(matches!(
            PipelineConfig::load_toml(&path),
            Err(ForecastError::TomlDe(_))
        ));
    }

    #[test]
    fn test_validation_catches_bad_sections() {
        let config = PipelineConfig::default()
            .with_training(TrainingConfig::default().with_test_fraction(1.5));
        assert!(config.validate().unwrap_err().contains("test_fraction"));
    }
}
