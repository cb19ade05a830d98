//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```
//! use event_forecaster::prelude::*;
//!
//! let config = PipelineConfig::default();
//! let pipeline = Pipeline::from_config(config).unwrap();
//! # let _ = pipeline;
//! ```
//!
//! # What's Included
//!
//! ## Core Pipeline
//! - [`Pipeline`], [`PipelineBuilder`], [`PipelineConfig`], [`PipelineOutput`]
//!
//! ## Records
//! - [`PriceRecord`], [`EventRecord`], [`ForecastRow`]
//!
//! ## Training and Forecasting
//! - [`EventEncoder`], [`FeatureBuilder`], [`ModelTrainer`], [`TrainedModel`]
//! - [`Forecaster`], [`ForecastRequest`], [`PastEventPolicy`]
//!
//! ## Sources
//! - [`PriceSource`], [`EventSource`], [`InMemorySource`], [`JsonFileSource`]

pub use crate::builder::PipelineBuilder;
pub use crate::config::{ExperimentMetadata, PipelineConfig};
pub use crate::encoding::{EncoderState, EventEncoder};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureBuilder, FeatureConfig};
pub use crate::forecast::{ForecastConfig, ForecastRequest, Forecaster, PastEventPolicy};
pub use crate::model::Regressor;
pub use crate::pipeline::{Pipeline, PipelineOutput};
pub use crate::preprocessing::MissingValuePolicy;
pub use crate::records::{
    EventRecord, ForecastRow, PriceRecord, EVENT_CATEGORY_LABELS, NO_EVENT_LABEL,
};
pub use crate::sources::{EventSource, InMemorySource, JsonFileSource, PriceSource};
pub use crate::trainer::{ModelTrainer, TrainedModel, TrainingConfig, TrainingMetrics};
