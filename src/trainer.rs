//! Model training on a built feature frame.
//!
//! The trainer turns a [`FeatureFrame`] into a [`TrainedModel`]:
//!
//! 1. Fix the [`FeatureSchema`] from the frame's one-hot categories
//! 2. Lay the design matrix out by column name through the schema
//! 3. Split chronologically, holding out the tail
//! 4. Fit the [`StandardScaler`] on the training rows only
//! 5. Fit the regression and score it on the held-out rows
//!
//! # Example
//!
//! ```
//! use event_forecaster::encoding::EventEncoder;
//! use event_forecaster::features::{FeatureBuilder, FeatureConfig};
//! use event_forecaster::records::PriceRecord;
//! use event_forecaster::trainer::{ModelTrainer, TrainingConfig};
//! use chrono::{Days, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let prices: Vec<PriceRecord> = (0..100)
//!     .map(|i| PriceRecord::new(start + Days::new(i), 2000.0))
//!     .collect();
//!
//! let encoder = EventEncoder::default().fit(&[]);
//! let frame = FeatureBuilder::new(FeatureConfig::default(), &encoder)
//!     .build(&prices, &[])
//!     .unwrap();
//! let trained = ModelTrainer::new(TrainingConfig::default())
//!     .train(&frame, encoder)
//!     .unwrap();
//!
//! assert_eq!(trained.metrics.test_rows, 2);
//! assert!(trained.metrics.rmse < 1e-6);
//! ```

use crate::encoding::{EncoderState, OneHotEncoder};
use crate::error::{ForecastError, Result};
use crate::features::{FeatureFrame, FeatureRow};
use crate::model::{rmse, LinearRegression, Regressor};
use crate::preprocessing::StandardScaler;
use crate::schema::{FeatureCategory, FeatureSchema, PRICE_LAG1};
use chrono::NaiveDate;
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

/// Training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out from the tail (rounded up)
    pub test_fraction: f64,

    /// Minimum rows in the training split
    pub min_train_rows: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.02,
            min_train_rows: 10,
        }
    }
}

impl TrainingConfig {
    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    pub fn with_min_train_rows(mut self, rows: usize) -> Self {
        self.min_train_rows = rows;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            ));
        }
        if self.min_train_rows < 2 {
            return Err("min_train_rows must be >= 2".to_string());
        }
        Ok(())
    }

    /// Train/held-out sizes for `rows` total rows.
    pub fn split_sizes(&self, rows: usize) -> (usize, usize) {
        let test = ((rows as f64) * self.test_fraction).ceil() as usize;
        let test = test.min(rows);
        (rows - test, test)
    }

    /// Split sizes for `rows`, or [`ForecastError::InsufficientData`] when
    /// the held-out split is empty or training falls below the minimum.
    pub fn check_rows(&self, rows: usize) -> Result<(usize, usize)> {
        let (train_rows, test_rows) = self.split_sizes(rows);
        if test_rows == 0 || train_rows < self.min_train_rows {
            return Err(ForecastError::InsufficientData {
                rows,
                train_rows,
                test_rows,
                required: self.min_train_rows,
            });
        }
        Ok((train_rows, test_rows))
    }
}

/// Held-out evaluation of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Root-mean-squared error on the held-out tail
    pub rmse: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Everything the forecaster needs, produced by one training run.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: LinearRegression,
    pub scaler: StandardScaler,
    pub schema: FeatureSchema,
    pub one_hot: OneHotEncoder,
    pub encoder: EncoderState,
    pub metrics: TrainingMetrics,
    /// Date of the most recent price in the history
    pub last_known_date: NaiveDate,
    /// Most recent price in the history
    pub last_known_price: f64,
}

/// Fits [`TrainedModel`]s.
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train on `frame`, taking ownership of the encoder that produced it.
    pub fn train(&self, frame: &FeatureFrame, encoder: EncoderState) -> Result<TrainedModel> {
        self.config.validate().map_err(ForecastError::Config)?;

        let rows = frame.rows();
        let n = rows.len();
        let (n_train, n_test) = self.config.check_rows(n)?;

        let last = frame
            .last()
            .ok_or_else(|| ForecastError::data_format("empty feature frame"))?;
        let (last_known_date, last_known_price) = (last.date, last.price);

        let schema = FeatureSchema::model_inputs(frame.one_hot());
        let x = design_matrix(&schema, frame.one_hot(), rows)?;
        let y: Array1<f64> = rows.iter().map(|r| r.price).collect();

        let x_train = x.slice(s![..n_train, ..]).to_owned();
        let x_test = x.slice(s![n_train.., ..]).to_owned();
        let y_train = y.slice(s![..n_train]).to_owned();
        let y_test = y.slice(s![n_train..]).to_owned();

        let scaler = StandardScaler::fit(&x_train)?;
        let model = LinearRegression::fit(&scaler.transform(&x_train)?, &y_train)?;

        let predicted = model.predict_batch(&scaler.transform(&x_test)?);
        let metrics = TrainingMetrics {
            rmse: rmse(&y_test, &predicted),
            train_rows: n_train,
            test_rows: n_test,
        };

        log::info!(
            "Trained {} on {} rows x {} features; held-out RMSE {:.4} over {} rows",
            model.name(),
            n_train,
            schema.total_count(),
            metrics.rmse,
            n_test
        );

        Ok(TrainedModel {
            model,
            scaler,
            schema,
            one_hot: frame.one_hot().clone(),
            encoder,
            metrics,
            last_known_date,
            last_known_price,
        })
    }
}

/// Lay out `rows` as a design matrix in schema column order.
fn design_matrix(
    schema: &FeatureSchema,
    one_hot: &OneHotEncoder,
    rows: &[FeatureRow],
) -> Result<Array2<f64>> {
    let lag_col = schema
        .index_of(PRICE_LAG1)
        .ok_or_else(|| ForecastError::UnknownFeature(PRICE_LAG1.to_string()))?;
    let indicators = schema
        .features_by_category(FeatureCategory::EventIndicator)
        .into_iter()
        .map(|def| {
            def.event_code
                .and_then(|code| one_hot.position(code))
                .map(|pos| (def.index, pos))
                .ok_or_else(|| ForecastError::UnknownFeature(def.name.clone()))
        })
        .collect::<Result<Vec<(usize, usize)>>>()?;

    let mut x = Array2::zeros((rows.len(), schema.total_count()));
    for (i, row) in rows.iter().enumerate() {
        if row.event_one_hot.len() != one_hot.width() {
            return Err(ForecastError::SchemaMismatch {
                expected: one_hot.width(),
                actual: row.event_one_hot.len(),
            });
        }
        x[[i, lag_col]] = row.price_lag1;
        for &(col, pos) in &indicators {
            x[[i, col]] = row.event_one_hot[pos];
        }
    }
    Ok(x)
}
