//! Ordinary least squares with intercept.
//!
//! Fitting centres `X` and `y`, forms the normal equations
//! `(XcᵀXc) w = Xcᵀyc` and solves them by Gauss-Jordan elimination with
//! partial pivoting. Columns whose pivot vanishes (constant after scaling,
//! or a linear combination of earlier columns such as a full one-hot block)
//! are free and get weight 0. Any least-squares solution predicts the same
//! values for rows satisfying the same linear constraints as the training
//! rows, so the choice only matters for vectors outside that subspace.

use super::Regressor;
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};

/// Relative pivot tolerance against the largest Gram diagonal entry.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Fitted linear regression `y = intercept + w·x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    coefficients: Array1<f64>,
    intercept: f64,
    rank: usize,
}

impl LinearRegression {
    /// Fit on `x` (rows = samples) and targets `y`.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        let (n, p) = x.dim();
        if n == 0 || n != y.len() {
            return Err(ForecastError::InsufficientData {
                rows: n,
                train_rows: y.len(),
                test_rows: 0,
                required: 1,
            });
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(p));
        let y_mean = y.sum() / n as f64;

        let xc = x - &x_mean;
        let yc = y - y_mean;

        let gram = xc.t().dot(&xc);
        let rhs = xc.t().dot(&yc);
        let (coefficients, rank) = solve_normal_equations(gram, rhs);

        let intercept = y_mean - x_mean.dot(&coefficients);

        log::debug!(
            "Linear regression fitted on {n} rows x {p} features (rank {rank}), intercept {intercept:.4}"
        );

        Ok(Self {
            coefficients,
            intercept,
            rank,
        })
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of columns that received a pivot.
    pub fn rank(&self) -> usize {
        self.rank
    }
}

impl Regressor for LinearRegression {
    fn predict(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(
            features.len(),
            self.coefficients.len(),
            "feature width does not match the fitted model"
        );
        self.coefficients
            .iter()
            .zip(features)
            .map(|(w, f)| w * f)
            .sum::<f64>()
            + self.intercept
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn name(&self) -> &str {
        "LinearRegression"
    }
}

/// Solve a symmetric positive semi-definite system, zeroing free columns.
///
/// Returns the solution and the number of pivot columns.
fn solve_normal_equations(gram: Array2<f64>, rhs: Array1<f64>) -> (Array1<f64>, usize) {
    let p = rhs.len();
    let mut a = gram;
    let mut b = rhs;

    let max_diag = (0..p).map(|i| a[[i, i]].abs()).fold(0.0_f64, f64::max);
    let tol = max_diag * PIVOT_TOLERANCE;

    let mut pivot_row_of: Vec<Option<usize>> = vec![None; p];
    let mut row = 0;

    for col in 0..p {
        if row == p {
            break;
        }

        let (best, best_abs) = (row..p)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((row, -1.0), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        if best_abs <= tol {
            continue;
        }

        if best != row {
            for c in 0..p {
                a.swap([best, c], [row, c]);
            }
            b.swap(best, row);
        }

        let pivot = a[[row, col]];
        for c in 0..p {
            a[[row, c]] /= pivot;
        }
        b[row] /= pivot;

        for r in 0..p {
            if r == row {
                continue;
            }
            let factor = a[[r, col]];
            if factor == 0.0 {
                continue;
            }
            for c in 0..p {
                a[[r, c]] -= factor * a[[row, c]];
            }
            b[r] -= factor * b[row];
        }

        pivot_row_of[col] = Some(row);
        row += 1;
    }

    let solution = pivot_row_of
        .iter()
        .map(|pr| pr.map_or(0.0, |r| b[r]))
        .collect();
    (solution, row)
}
