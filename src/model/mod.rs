//! Regression models and error metrics.
//!
//! The forecaster only needs "scaled feature row in, price out", expressed
//! by the [`Regressor`] trait. [`LinearRegression`] is the fitted model used
//! by the trainer.
//!
//! # Usage
//!
//! ```
//! use event_forecaster::model::{LinearRegression, Regressor};
//! use ndarray::array;
//!
//! let x = array![[0.0], [1.0], [2.0], [3.0]];
//! let y = array![1.0, 3.0, 5.0, 7.0];
//! let model = LinearRegression::fit(&x, &y).unwrap();
//!
//! assert!((model.predict(&[4.0]) - 9.0).abs() < 1e-9);
//! ```

mod linear;
pub mod metrics;

pub use linear::LinearRegression;
pub use metrics::rmse;

use ndarray::{Array1, Array2};

/// A fitted model mapping a standardized feature row to a price.
///
/// Implementors must be `Send + Sync` so one fitted model can serve
/// independent forecast requests in parallel.
pub trait Regressor: Send + Sync {
    /// Predict one row, laid out in schema column order.
    ///
    /// `features` must hold exactly [`Regressor::n_features`] values; callers
    /// check the width against the schema first.
    fn predict(&self, features: &[f64]) -> f64;

    /// Number of features expected by this model.
    fn n_features(&self) -> usize;

    /// Model name for logging.
    fn name(&self) -> &str;

    /// Predict every row of a matrix.
    fn predict_batch(&self, x: &Array2<f64>) -> Array1<f64> {
        x.rows()
            .into_iter()
            .map(|row| match row.as_slice() {
                Some(slice) => self.predict(slice),
                None => self.predict(&row.to_vec()),
            })
            .collect()
    }
}
