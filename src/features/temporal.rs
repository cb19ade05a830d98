//! Temporal series transforms.
//!
//! All functions are position-based over a date-sorted series and return
//! `None` where the value is undefined (not enough history). Filling is left
//! to [`crate::preprocessing::MissingValuePolicy`].

/// Backward shift: `out[i] = values[i - steps]`.
pub fn shift(values: &[f64], steps: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| i.checked_sub(steps).map(|j| values[j]))
        .collect()
}

/// Day-over-day change in percent: `(p[i] / p[i-1] - 1) * 100`.
///
/// Undefined for the first row and when the previous price is 0.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i == 0 || values[i - 1] == 0.0 {
                None
            } else {
                Some((values[i] / values[i - 1] - 1.0) * 100.0)
            }
        })
        .collect()
}

/// Trailing mean over `window` rows, including the current one.
///
/// Undefined for the first `window - 1` rows and whenever any value inside
/// the window is undefined.
pub fn trailing_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum = slice.iter().try_fold(0.0, |acc, v| v.map(|x| acc + x))?;
            Some(sum / window as f64)
        })
        .collect()
}
