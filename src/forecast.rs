//! Recursive multi-day forecasting with one hypothetical event.
//!
//! Starting the day after the last known price, the forecaster predicts one
//! day at a time and feeds each prediction back as the next day's
//! `price_lag1`. The requested event category is encoded only on the event
//! date; every other day is a "no event" day. The path ends `horizon_days`
//! after the event date.
//!
//! # Example
//!
//! ```
//! use event_forecaster::encoding::EventEncoder;
//! use event_forecaster::features::{FeatureBuilder, FeatureConfig};
//! use event_forecaster::forecast::{Forecaster, ForecastConfig, ForecastRequest};
//! use event_forecaster::records::PriceRecord;
//! use event_forecaster::trainer::ModelTrainer;
//! use chrono::{Days, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let prices: Vec<PriceRecord> = (0..100)
//!     .map(|i| PriceRecord::new(start + Days::new(i), 2000.0))
//!     .collect();
//! let encoder = EventEncoder::default().fit(&[]);
//! let frame = FeatureBuilder::new(FeatureConfig::default(), &encoder)
//!     .build(&prices, &[])
//!     .unwrap();
//! let trained = ModelTrainer::default().train(&frame, encoder).unwrap();
//!
//! let event_date = start + Days::new(105);
//! let request = ForecastRequest::new(event_date, "No Event", 10);
//! let path = Forecaster::new(&trained, ForecastConfig::default())
//!     .forecast(&request)
//!     .unwrap();
//!
//! // Days 100..=115
//! assert_eq!(path.len(), 16);
//! assert!((path[0].forecasted_price - 2000.0).abs() < 1e-6);
//! ```

use crate::encoding::NO_EVENT_CODE;
use crate::error::{ForecastError, Result};
use crate::model::Regressor;
use crate::records::{ForecastRow, EVENT_CATEGORY_LABELS, NO_EVENT_LABEL};
use crate::schema::PRICE_LAG1;
use crate::trainer::TrainedModel;
use chrono::{Days, NaiveDate};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Longest accepted horizon, in days.
pub const MAX_HORIZON_DAYS: u32 = 365;

/// Handling of an event dated before the first forecastable day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PastEventPolicy {
    /// Fail with a validation error
    #[default]
    Reject,
    /// Log a warning and forecast without the event
    Ignore,
}

/// Forecast configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Upper bound for `horizon_days`
    pub max_horizon_days: u32,

    pub past_event_policy: PastEventPolicy,

    /// Category labels a request may name, besides "No Event"
    pub allowed_categories: Vec<String>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            max_horizon_days: MAX_HORIZON_DAYS,
            past_event_policy: PastEventPolicy::Reject,
            allowed_categories: EVENT_CATEGORY_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ForecastConfig {
    pub fn with_past_event_policy(mut self, policy: PastEventPolicy) -> Self {
        self.past_event_policy = policy;
        self
    }

    pub fn with_allowed_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_horizon_days == 0 || self.max_horizon_days > MAX_HORIZON_DAYS {
            return Err(format!(
                "max_horizon_days must be in [1, {MAX_HORIZON_DAYS}], got {}",
                self.max_horizon_days
            ));
        }
        Ok(())
    }

    fn accepts_category(&self, category: &str) -> bool {
        category == NO_EVENT_LABEL || self.allowed_categories.iter().any(|c| c == category)
    }
}

/// A forecast request as received at the service boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub event_date: NaiveDate,
    pub event_category: String,
    pub horizon_days: u32,
}

impl ForecastRequest {
    pub fn new(event_date: NaiveDate, event_category: impl Into<String>, horizon_days: u32) -> Self {
        Self {
            event_date,
            event_category: event_category.into(),
            horizon_days,
        }
    }

    /// Check horizon bounds and category membership.
    pub fn validate(&self, config: &ForecastConfig) -> Result<()> {
        if self.horizon_days < 1 || self.horizon_days > config.max_horizon_days {
            return Err(ForecastError::validation(format!(
                "horizon_days must be in [1, {}], got {}",
                config.max_horizon_days, self.horizon_days
            )));
        }
        if !config.accepts_category(&self.event_category) {
            return Err(ForecastError::validation(format!(
                "unknown event category '{}'",
                self.event_category
            )));
        }
        Ok(())
    }
}

/// Runs forecast requests against one trained model.
pub struct Forecaster<'a> {
    trained: &'a TrainedModel,
    config: ForecastConfig,
}

impl<'a> Forecaster<'a> {
    pub fn new(trained: &'a TrainedModel, config: ForecastConfig) -> Self {
        Self { trained, config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Validate `request`, then produce the forecast path.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<Vec<ForecastRow>> {
        self.config.validate().map_err(ForecastError::Config)?;
        request.validate(&self.config)?;

        let first_day = next_day(self.trained.last_known_date)?;
        let mut category = Some(request.event_category.as_str());

        if request.event_date < first_day {
            match self.config.past_event_policy {
                PastEventPolicy::Reject => {
                    return Err(ForecastError::validation(format!(
                        "event date {} is before the first forecastable day {}",
                        request.event_date, first_day
                    )));
                }
                PastEventPolicy::Ignore => {
                    let last_day = last_forecast_day(request.event_date, request.horizon_days)?;
                    if last_day < first_day {
                        return Err(ForecastError::validation(format!(
                            "forecast range ends {last_day}, before the first forecastable day {first_day}"
                        )));
                    }
                    log::warn!(
                        "Event date {} precedes first forecastable day {}; forecasting without the event",
                        request.event_date,
                        first_day
                    );
                    category = None;
                }
            }
        }

        forecast_path(
            self.trained,
            &self.trained.model,
            request.event_date,
            category,
            request.horizon_days,
        )
    }
}

/// Forecast with the default configuration.
pub fn forecast(trained: &TrainedModel, request: &ForecastRequest) -> Result<Vec<ForecastRow>> {
    Forecaster::new(trained, ForecastConfig::default()).forecast(request)
}

/// Core recursive loop over `last_known_date + 1 ..= event_date + horizon_days`.
///
/// `event_category` is encoded on `event_date` only; `None` forecasts a path
/// with no event at all. Performs no request validation.
pub fn forecast_path(
    trained: &TrainedModel,
    model: &dyn Regressor,
    event_date: NaiveDate,
    event_category: Option<&str>,
    horizon_days: u32,
) -> Result<Vec<ForecastRow>> {
    let schema = &trained.schema;
    schema.check_width(model.n_features())?;

    let first_day = next_day(trained.last_known_date)?;
    let last_day = last_forecast_day(event_date, horizon_days)?;
    if last_day < first_day {
        log::warn!("Empty forecast range: {last_day} precedes first forecastable day {first_day}");
    }

    let event_code = trained.encoder.encode(event_category);
    let no_event_base = indicator_vector(trained, NO_EVENT_CODE)?;
    let event_base = indicator_vector(trained, event_code)?;

    log::debug!(
        "Forecasting {first_day}..={last_day} with event code {event_code} on {event_date}"
    );

    let mut path = Vec::new();
    let mut previous_price = trained.last_known_price;

    for date in first_day.iter_days().take_while(|d| *d <= last_day) {
        let mut features = if date == event_date {
            event_base.clone()
        } else {
            no_event_base.clone()
        };
        schema.set(&mut features, PRICE_LAG1, previous_price)?;

        let scaled = trained.scaler.transform_row(ArrayView1::from(features.as_slice()))?;
        let predicted_price = model.predict(&scaled.to_vec());

        path.push(ForecastRow {
            date,
            forecasted_price: predicted_price,
        });
        previous_price = predicted_price;
    }

    Ok(path)
}

/// Schema-width vector with only the indicator for `code` set.
///
/// Codes absent from the training one-hot set leave every indicator at 0.
fn indicator_vector(trained: &TrainedModel, code: i32) -> Result<Vec<f64>> {
    let mut vector = trained.schema.zeros();
    if trained.one_hot.position(code).is_some() {
        trained
            .schema
            .set(&mut vector, &trained.one_hot.column_name(code), 1.0)?;
    }
    Ok(vector)
}

fn last_forecast_day(event_date: NaiveDate, horizon_days: u32) -> Result<NaiveDate> {
    event_date
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .ok_or_else(|| {
            ForecastError::validation(format!(
                "event date {event_date} plus {horizon_days} days is out of range"
            ))
        })
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| ForecastError::validation(format!("no day after {date}")))
}
