//! Event Forecaster
//!
//! Event-conditioned commodity price forecasting with a linear model.
//!
//! # Overview
//!
//! Given a daily price history (gold in the reference deployment) and a
//! history of categorized world events, this library:
//!
//! - encodes event categories into a bounded code space (top-K + overflow)
//! - builds lagged and rolling per-day features joined with events by date
//! - trains a linear regression on `price_lag1` and one-hot event columns
//! - forecasts day by day up to a horizon past a hypothetical future event,
//!   feeding each prediction back as the next day's lag
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Event Forecaster                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  records        - Price, event and forecast records             │
//! │  encoding/      - Event category, outcome and one-hot encoders  │
//! │  features/      - Date join, lags, rolling means                │
//! │  preprocessing/ - Missing-value policy, standard scaler         │
//! │  schema/        - Named model-input columns                     │
//! │  model/         - Regression trait, OLS, RMSE                   │
//! │  trainer        - Chronological split and fitting               │
//! │  forecast       - Recursive multi-day forecasting               │
//! │  pipeline       - End-to-end orchestration                      │
//! │  batch          - Many scenarios against one model              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use event_forecaster::prelude::*;
//! use chrono::{Days, NaiveDate};
//!
//! # fn main() -> event_forecaster::Result<()> {
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let prices: Vec<PriceRecord> = (0..100)
//!     .map(|i| PriceRecord::new(start + Days::new(i), 2000.0))
//!     .collect();
//!
//! let pipeline = PipelineBuilder::new().build()?;
//! let trained = pipeline.train(&prices, &[])?;
//!
//! let request = ForecastRequest::new(start + Days::new(102), "No Event", 7);
//! let path = pipeline.forecast(&trained, &request)?;
//!
//! assert_eq!(path.len(), 10);
//! assert!((path[9].forecasted_price - 2000.0).abs() < 1e-6);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod encoding;
pub mod error;
pub mod features;
pub mod forecast;
pub mod model;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod records;
pub mod schema;
pub mod sources;
pub mod trainer;
pub mod validation;

// Re-exports - Errors
pub use error::{ForecastError, Result};

// Re-exports - Records
pub use records::{EventRecord, ForecastRow, PriceRecord, EVENT_CATEGORY_LABELS, NO_EVENT_LABEL};

// Re-exports - Encoding
pub use encoding::{EncoderState, EventEncoder, OneHotEncoder, OutcomeEncoder};

// Re-exports - Features
pub use features::{FeatureBuilder, FeatureConfig, FeatureFrame, FeatureRow};

// Re-exports - Schema
pub use schema::{FeatureCategory, FeatureDef, FeatureSchema};

// Re-exports - Preprocessing
pub use preprocessing::{MissingValuePolicy, Normalizer, StandardScaler, ZScoreNormalizer};

// Re-exports - Model and training
pub use model::{LinearRegression, Regressor};
pub use trainer::{ModelTrainer, TrainedModel, TrainingConfig, TrainingMetrics};

// Re-exports - Forecasting
pub use forecast::{forecast, ForecastConfig, ForecastRequest, Forecaster, PastEventPolicy};

// Re-exports - Config
pub use builder::PipelineBuilder;
pub use config::{EncoderConfig, ExperimentMetadata, PipelineConfig};

// Re-exports - Validation
pub use validation::{RecordValidator, ValidationConfig, ValidationLevel, ValidationResult};

// Re-exports - Pipeline
pub use pipeline::{Pipeline, PipelineOutput};
pub use sources::{EventSource, InMemorySource, JsonFileSource, PriceSource};
