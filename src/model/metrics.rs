//! Held-out error metric.

use ndarray::Array1;

/// Root-mean-squared error. Returns 0 for empty inputs.
pub fn rmse(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let sse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    (sse / n as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rmse_known_value() {
        let a = array![1.0, 2.0, 3.0];
        let p = array![1.0, 2.0, 6.0];
        assert!((rmse(&a, &p) - 3.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_rmse_perfect() {
        let a = array![2000.0, 2000.0];
        assert_eq!(rmse(&a, &a), 0.0);
    }

    #[test]
    fn test_rmse_empty() {
        let e = Array1::<f64>::zeros(0);
        assert_eq!(rmse(&e, &e), 0.0);
    }
}
