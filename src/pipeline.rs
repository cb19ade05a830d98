//! End-to-end forecasting pipeline.
//!
//! Connects every stage behind one configuration:
//!
//! # Architecture
//!
//! ```text
//! PriceSource ─┐
//!              ├─→ RecordValidator → EventEncoder.fit → FeatureBuilder
//! EventSource ─┘                                            ↓
//!                                         ModelTrainer (chronological split)
//!                                                           ↓
//!                                                     TrainedModel
//!                                                           ↓
//!                              ForecastRequest → Forecaster → Vec<ForecastRow>
//! ```
//!
//! Each stage fully materializes its output before the next starts. Nothing
//! is cached between runs; [`Pipeline::train`] can be called once and its
//! [`TrainedModel`] reused for many requests.
//!
//! # Example
//!
//! ```
//! use event_forecaster::prelude::*;
//! use chrono::{Days, NaiveDate};
//!
//! # fn main() -> event_forecaster::Result<()> {
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let prices: Vec<PriceRecord> = (0..60)
//!     .map(|i| PriceRecord::new(start + Days::new(i), 2000.0 + i as f64))
//!     .collect();
//! let events = vec![EventRecord::new(1, start + Days::new(20), "Economic")];
//!
//! let pipeline = PipelineBuilder::new().build()?;
//! let request = ForecastRequest::new(start + Days::new(65), "Economic", 10);
//! let output = pipeline.run(&prices, &events, &request)?;
//!
//! assert_eq!(output.forecast.len(), 16);
//! # Ok(())
//! # }
//! ```
//!
//! # Output Structure
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `forecast` | `Vec<ForecastRow>` | Daily forecast path |
//! | `metrics` | `TrainingMetrics` | Held-out RMSE and split sizes |
//! | `feature_rows` | `usize` | Rows produced by the feature builder |
//! | `warnings` | `Vec<String>` | Record validation warnings |

use crate::config::PipelineConfig;
use crate::encoding::EventEncoder;
use crate::error::{ForecastError, Result};
use crate::features::FeatureBuilder;
use crate::forecast::{ForecastRequest, Forecaster};
use crate::records::{EventRecord, ForecastRow, PriceRecord};
use crate::sources::{EventSource, PriceSource};
use crate::trainer::{ModelTrainer, TrainedModel, TrainingMetrics};
use crate::validation::RecordValidator;

/// Output from one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Forecast path, one row per day
    pub forecast: Vec<ForecastRow>,

    /// Held-out evaluation of the model that produced the path
    pub metrics: TrainingMetrics,

    /// Rows produced by the feature builder
    pub feature_rows: usize,

    /// Record validation warnings
    pub warnings: Vec<String>,
}

/// Forecasting pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate().map_err(ForecastError::Config)?;
        if let Some(meta) = &config.metadata {
            log::info!("Pipeline configured for experiment '{}'", meta.name);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validate records, fit the encoder, build features and train.
    pub fn train(&self, prices: &[PriceRecord], events: &[EventRecord]) -> Result<TrainedModel> {
        self.train_with_report(prices, events).map(|(trained, _)| trained)
    }

    fn train_with_report(
        &self,
        prices: &[PriceRecord],
        events: &[EventRecord],
    ) -> Result<(TrainedModel, TrainingReport)> {
        // Too short a history is a row-count failure, not a record defect
        self.config.training.check_rows(prices.len())?;

        let validation = RecordValidator::with_config(self.config.validation.clone())
            .check(prices, events)?;

        let encoder = EventEncoder::new(self.config.encoder.top_k).fit(events);
        log::info!(
            "Encoded {} event categories (top {}, overflow code {})",
            encoder.categories().len(),
            encoder.top_k(),
            encoder.overflow_code()
        );

        let frame = FeatureBuilder::new(self.config.features.clone(), &encoder)
            .build(prices, events)?;
        let feature_rows = frame.len();

        let trained = ModelTrainer::new(self.config.training.clone()).train(&frame, encoder)?;

        Ok((
            trained,
            TrainingReport {
                feature_rows,
                warnings: validation.warnings(),
            },
        ))
    }

    /// Forecast with an already trained model.
    pub fn forecast(&self, trained: &TrainedModel, request: &ForecastRequest) -> Result<Vec<ForecastRow>> {
        let path = Forecaster::new(trained, self.config.forecast.clone()).forecast(request)?;
        log::info!(
            "Forecast {} days for '{}' on {} (horizon {})",
            path.len(),
            request.event_category,
            request.event_date,
            request.horizon_days
        );
        Ok(path)
    }

    /// Train on the given histories and answer one request.
    ///
    /// The request is validated before any training work starts.
    pub fn run(
        &self,
        prices: &[PriceRecord],
        events: &[EventRecord],
        request: &ForecastRequest,
    ) -> Result<PipelineOutput> {
        request.validate(&self.config.forecast)?;

        let (trained, report) = self.train_with_report(prices, events)?;
        let forecast = self.forecast(&trained, request)?;

        Ok(PipelineOutput {
            forecast,
            metrics: trained.metrics,
            feature_rows: report.feature_rows,
            warnings: report.warnings,
        })
    }

    /// Fetch records from the sources, then [`Pipeline::run`].
    pub fn run_from_sources(
        &self,
        prices: &dyn PriceSource,
        events: &dyn EventSource,
        request: &ForecastRequest,
    ) -> Result<PipelineOutput> {
        let price_records = prices.fetch_prices()?;
        let event_records = events.fetch_events()?;
        log::info!(
            "Fetched {} prices from {} and {} events from {}",
            price_records.len(),
            prices.name(),
            event_records.len(),
            events.name()
        );
        self.run(&price_records, &event_records, request)
    }
}

struct TrainingReport {
    feature_rows: usize,
    warnings: Vec<String>,
}
