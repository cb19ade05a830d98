//! Feature standardization.
//!
//! Model inputs are standardized to zero mean and unit variance with
//! statistics taken from the training split only:
//!
//! ```text
//! normalized = (x - mean) / scale
//! scale      = population std, or 1 when the column is constant
//! ```
//!
//! # Architecture
//!
//! ```text
//! Normalizer (trait)
//!     └── ZScoreNormalizer      one column, Welford running stats
//!
//! StandardScaler               one ZScoreNormalizer per schema column,
//!                              frozen after fit
//! ```
//!
//! The scaler is fitted once and then only read: the held-out split and
//! every forecast step go through the identical transform.

use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Trait for feature normalization strategies.
pub trait Normalizer: Send + Sync {
    /// Update normalizer state with a new value.
    fn update(&mut self, value: f64);

    /// Normalize a single value.
    fn normalize(&self, value: f64) -> f64;

    /// Normalize a batch of values.
    ///
    /// Default implementation calls `normalize` for each value.
    fn normalize_batch(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.normalize(v)).collect()
    }

    /// Reset normalizer state.
    fn reset(&mut self);
}

/// Z-score normalization with running statistics.
///
/// Uses Welford's online algorithm for numerical stability. The standard
/// deviation is the population one (divides by `n`).
///
/// # Example
///
/// ```
/// use event_forecaster::preprocessing::{Normalizer, ZScoreNormalizer};
///
/// let mut normalizer = ZScoreNormalizer::new();
/// for value in &[10.0, 20.0, 30.0, 40.0, 50.0] {
///     normalizer.update(*value);
/// }
///
/// // mean=30, std≈14.14
/// let normalized = normalizer.normalize(50.0);
/// assert!((normalized - 1.414).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct ZScoreNormalizer {
    /// Running mean (Welford's algorithm)
    mean: f64,

    /// Running M2 for variance calculation (Welford's algorithm)
    m2: f64,

    /// Number of samples seen
    count: u64,

    /// Below this std the column counts as constant
    min_std: f64,
}

impl ZScoreNormalizer {
    /// Create a new Z-score normalizer.
    pub fn new() -> Self {
        Self {
            mean: 0.0,
            m2: 0.0,
            count: 0,
            min_std: 1e-12,
        }
    }

    /// Get the current mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation (0 with fewer than 2 samples).
    pub fn std(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.m2 / (self.count as f64)).sqrt()
    }

    /// Divisor used by [`Normalizer::normalize`]: the std, or 1 for a
    /// constant column.
    pub fn scale(&self) -> f64 {
        let std = self.std();
        if std < self.min_std {
            1.0
        } else {
            std
        }
    }

    /// Get the number of samples seen.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Default for ZScoreNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for ZScoreNormalizer {
    fn update(&mut self, value: f64) {
        // Welford's online algorithm for mean and variance
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    fn normalize(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale()
    }

    fn reset(&mut self) {
        self.mean = 0.0;
        self.m2 = 0.0;
        self.count = 0;
    }
}

/// Column-wise standard scaler, fitted once on the training matrix.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    columns: Vec<ZScoreNormalizer>,
}

impl StandardScaler {
    /// Fit per-column statistics on `x` (rows = samples).
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(ForecastError::InsufficientData {
                rows: 0,
                train_rows: 0,
                test_rows: 0,
                required: 1,
            });
        }

        let columns = x
            .axis_iter(Axis(1))
            .map(|col| {
                let mut norm = ZScoreNormalizer::new();
                col.iter().for_each(|&v| norm.update(v));
                norm
            })
            .collect();

        Ok(Self { columns })
    }

    /// Number of columns the scaler was fitted on.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Fitted column means.
    pub fn means(&self) -> Array1<f64> {
        self.columns.iter().map(ZScoreNormalizer::mean).collect()
    }

    /// Fitted column scales.
    pub fn scales(&self) -> Array1<f64> {
        self.columns.iter().map(ZScoreNormalizer::scale).collect()
    }

    /// Standardize a matrix with the fitted statistics.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x.ncols())?;
        let mut out = x.clone();
        for (mut col, norm) in out.axis_iter_mut(Axis(1)).zip(&self.columns) {
            col.mapv_inplace(|v| norm.normalize(v));
        }
        Ok(out)
    }

    /// Standardize one row.
    pub fn transform_row(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(&self.columns)
            .map(|(&v, norm)| norm.normalize(v))
            .collect())
    }

    fn check_width(&self, actual: usize) -> Result<()> {
        if actual != self.width() {
            return Err(ForecastError::SchemaMismatch {
                expected: self.width(),
                actual,
            });
        }
        Ok(())
    }
}
