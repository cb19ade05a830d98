//! Batch scenario forecasting.
//!
//! Evaluates many independent [`ForecastRequest`]s ("what if a War happens
//! on 2024-05-01?", "what if nothing happens?") against one immutable
//! [`TrainedModel`]. With the `parallel` feature the requests run on a
//! local Rayon pool; without it they run sequentially. Both produce the same
//! output in request order.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │               forecast_scenarios              │
//! │  ┌─────────────────────────────────────────┐  │
//! │  │        Rayon Thread Pool (local)        │  │
//! │  │                                         │  │
//! │  │  Request 1    Request 2    Request N    │  │
//! │  │      │            │            │        │  │
//! │  │      └──── &TrainedModel (shared) ─┘    │  │
//! │  │      ▼            ▼            ▼        │  │
//! │  │  Scenario     Scenario     Scenario     │  │
//! │  └───────────────────┬─────────────────────┘  │
//! │                      ▼                        │
//! │                 BatchOutput                   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use event_forecaster::batch::{forecast_scenarios, BatchConfig, ErrorMode};
//!
//! let requests: Vec<ForecastRequest> = EVENT_CATEGORY_LABELS
//!     .iter()
//!     .map(|c| ForecastRequest::new(event_date, *c, 30))
//!     .collect();
//!
//! let batch = BatchConfig::new()
//!     .with_threads(4)
//!     .with_error_mode(ErrorMode::CollectErrors);
//! let output = forecast_scenarios(&trained, &forecast_config, &requests, &batch)?;
//! println!("{} scenarios in {:?}", output.successful_count(), output.elapsed);
//! ```

use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastConfig, ForecastRequest, Forecaster};
use crate::records::ForecastRow;
use crate::trainer::TrainedModel;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ============================================================================
// Configuration
// ============================================================================

/// Error handling mode for batch processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first (lowest index) failing request.
    #[default]
    FailFast,

    /// Keep going and report every failure in the output.
    CollectErrors,
}

/// Configuration for batch processing.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Number of threads to use.
    ///
    /// - `None`: Use Rayon default (typically num_cpus)
    /// - `Some(n)`: Use exactly n threads
    ///
    /// Ignored without the `parallel` feature.
    pub num_threads: Option<usize>,

    /// How to handle errors during processing.
    pub error_mode: ErrorMode,
}

impl BatchConfig {
    /// Create a new batch configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of threads to use.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Set the error handling mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.num_threads == Some(0) {
            return Err("Thread count must be > 0".to_string());
        }
        Ok(())
    }

    /// Get effective thread count.
    pub fn effective_threads(&self) -> usize {
        #[cfg(feature = "parallel")]
        {
            self.num_threads.unwrap_or_else(rayon::current_num_threads)
        }
        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// One successfully forecast scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Position of the request in the input slice.
    pub index: usize,

    pub request: ForecastRequest,

    pub forecast: Vec<ForecastRow>,

    /// Time spent on this request.
    pub elapsed: Duration,
}

impl ScenarioResult {
    /// Forecast on the event date, if the path covers it.
    pub fn price_on_event_date(&self) -> Option<f64> {
        self.forecast
            .iter()
            .find(|row| row.date == self.request.event_date)
            .map(|row| row.forecasted_price)
    }

    /// Last forecast value of the path.
    pub fn final_price(&self) -> Option<f64> {
        self.forecast.last().map(|row| row.forecasted_price)
    }
}

/// A failed scenario.
#[derive(Debug)]
pub struct ScenarioError {
    pub index: usize,
    pub request: ForecastRequest,
    pub error: ForecastError,
}

impl ScenarioError {
    /// Wrap the error with the request that caused it.
    pub fn into_error(self) -> ForecastError {
        ForecastError::Scenario {
            index: self.index,
            category: self.request.event_category,
            event_date: self.request.event_date,
            source: Box::new(self.error),
        }
    }
}

/// Output from a batch run, in request order.
#[derive(Debug)]
pub struct BatchOutput {
    pub results: Vec<ScenarioResult>,
    pub errors: Vec<ScenarioError>,
    pub elapsed: Duration,
    pub threads_used: usize,
}

impl BatchOutput {
    pub fn successful_count(&self) -> usize {
        self.results.len()
    }

    pub fn failed_count(&self) -> usize {
        self.errors.len()
    }

    /// Total forecast rows across all scenarios.
    pub fn total_rows(&self) -> usize {
        self.results.iter().map(|r| r.forecast.len()).sum()
    }
}

// ============================================================================
// Processing
// ============================================================================

/// Forecast every request against `trained`.
pub fn forecast_scenarios(
    trained: &TrainedModel,
    forecast_config: &ForecastConfig,
    requests: &[ForecastRequest],
    batch_config: &BatchConfig,
) -> Result<BatchOutput> {
    batch_config.validate().map_err(ForecastError::Config)?;
    let start = Instant::now();
    let threads_used = batch_config.effective_threads();

    let outcomes = run_all(trained, forecast_config, requests, threads_used)?;

    let mut results = Vec::with_capacity(outcomes.len());
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(failure) => {
                if batch_config.error_mode == ErrorMode::FailFast {
                    return Err(failure.into_error());
                }
                errors.push(failure);
            }
        }
    }

    log::info!(
        "Forecast {} scenarios ({} failed) on {} thread(s) in {:?}",
        results.len(),
        errors.len(),
        threads_used,
        start.elapsed()
    );

    Ok(BatchOutput {
        results,
        errors,
        elapsed: start.elapsed(),
        threads_used,
    })
}

type Outcome = std::result::Result<ScenarioResult, ScenarioError>;

fn run_one(forecaster: &Forecaster<'_>, index: usize, request: &ForecastRequest) -> Outcome {
    let start = Instant::now();
    match forecaster.forecast(request) {
        Ok(forecast) => Ok(ScenarioResult {
            index,
            request: request.clone(),
            forecast,
            elapsed: start.elapsed(),
        }),
        Err(e) => Err(ScenarioError {
            index,
            request: request.clone(),
            error: e,
        }),
    }
}

#[cfg(feature = "parallel")]
fn run_all(
    trained: &TrainedModel,
    forecast_config: &ForecastConfig,
    requests: &[ForecastRequest],
    threads: usize,
) -> Result<Vec<Outcome>> {
    // Local pool: build_global() only works once per process
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| ForecastError::Config(format!("Failed to create thread pool: {e}")))?;

    let forecaster = Forecaster::new(trained, forecast_config.clone());
    Ok(pool.install(|| {
        requests
            .par_iter()
            .enumerate()
            .map(|(index, request)| run_one(&forecaster, index, request))
            .collect()
    }))
}

#[cfg(not(feature = "parallel"))]
fn run_all(
    trained: &TrainedModel,
    forecast_config: &ForecastConfig,
    requests: &[ForecastRequest],
    _threads: usize,
) -> Result<Vec<Outcome>> {
    let forecaster = Forecaster::new(trained, forecast_config.clone());
    Ok(requests
        .iter()
        .enumerate()
        .map(|(index, request)| run_one(&forecaster, index, request))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::EventEncoder;
    use crate::features::{FeatureBuilder, FeatureConfig};
    use crate::forecast::forecast;
    use crate::records::{EventRecord, PriceRecord};
    use crate::trainer::ModelTrainer;
    use chrono::{Days, NaiveDate};

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(offset)
    }

    fn trained() -> TrainedModel {
        let prices: Vec<PriceRecord> = (0..100)
            .map(|i| PriceRecord::new(day(i), if i < 50 { 2000.0 } else { 2100.0 }))
            .collect();
        let events = vec![EventRecord::new(1, day(50), "Economic")];
        let encoder = EventEncoder::default().fit(&events);
        let frame = FeatureBuilder::new(FeatureConfig::default(), &encoder)
            .build(&prices, &events)
            .unwrap();
        ModelTrainer::default().train(&frame, encoder).unwrap()
    }

    fn requests() -> Vec<ForecastRequest> {
        vec![
            ForecastRequest::new(day(105), "Economic", 10),
            ForecastRequest::new(day(105), "No Event", 10),
            ForecastRequest::new(day(110), "Political", 5),
        ]
    }

    #[test]
    fn test_matches_single_forecasts_in_order() {
        let model = trained();
        let reqs = requests();
        let output =
            forecast_scenarios(&model, &ForecastConfig::default(), &reqs, &BatchConfig::new())
                .unwrap();

        assert_eq!(output.successful_count(), 3);
        for (i, result) in output.results.iter().enumerate() {
            assert_eq!(result.index, i);
            assert_eq!(result.forecast, forecast(&model, &reqs[i]).unwrap());
        }
    }

    #[test]
    fn test_event_date_price() {
        let model = trained();
        let output = forecast_scenarios(
            &model,
            &ForecastConfig::default(),
            &requests(),
            &BatchConfig::new(),
        )
        .unwrap();
        let with_event = output.results[0].price_on_event_date().unwrap();
        let baseline = output.results[1].price_on_event_date().unwrap();
        assert!((with_event - baseline).abs() > 1.0);
        assert_eq!(output.total_rows(), 16 + 16 + 16);
    }

    #[test]
    fn test_fail_fast() {
        let model = trained();
        let mut reqs = requests();
        reqs.push(ForecastRequest::new(day(105), "Economic", 0));
        let err = forecast_scenarios(&model, &ForecastConfig::default(), &reqs, &BatchConfig::new())
            .unwrap_err();
        assert!(err.to_string().contains("Scenario 3"));
        match err {
            ForecastError::Scenario { index, source, .. } => {
                assert_eq!(index, 3);
                assert!(matches!(*source, ForecastError::Validation(_)));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_fail_fast_keeps_error_kind() {
        let model = trained();
        let config = ForecastConfig {
            max_horizon_days: 0,
            ..ForecastConfig::default()
        };
        let err = forecast_scenarios(&model, &config, &requests(), &BatchConfig::new()).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Scenario { index: 0, ref source, .. }
                if matches!(**source, ForecastError::Config(_))
        ));
    }

    #[test]
    fn test_collect_errors() {
        let model = trained();
        let mut reqs = requests();
        reqs.insert(1, ForecastRequest::new(day(105), "Unknown", 10));
        let batch = BatchConfig::new().with_error_mode(ErrorMode::CollectErrors);
        let output = forecast_scenarios(&model, &ForecastConfig::default(), &reqs, &batch).unwrap();

        assert_eq!(output.successful_count(), 3);
        assert_eq!(output.failed_count(), 1);
        assert_eq!(output.errors[0].index, 1);
        assert!(matches!(output.errors[0].error, ForecastError::Validation(_)));
        assert_eq!(output.results[1].index, 2);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let model = trained();
        let batch = BatchConfig::new().with_threads(0);
        assert!(matches!(
            forecast_scenarios(&model, &ForecastConfig::default(), &requests(), &batch),
            Err(ForecastError::Config(_))
        ));
    }
}
