//! Missing-value policy.
//!
//! Lags and rolling windows leave the first rows of a series undefined, and
//! sources may omit change percentages. The policy decides what those gaps
//! become in the feature frame. `Zero` is the default and reproduces the
//! historical output exactly; early-window rows then carry zero-biased
//! features instead of being dropped.

use serde::{Deserialize, Serialize};

/// How undefined numeric feature values are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Replace every undefined value with 0.
    #[default]
    Zero,

    /// Carry the last defined value forward; leading gaps become 0.
    ForwardFill,

    /// Remove rows that have any undefined value.
    Drop,
}

impl MissingValuePolicy {
    /// Resolve one column.
    ///
    /// Under [`MissingValuePolicy::Drop`] undefined cells become 0 here; the
    /// caller removes those rows using [`MissingValuePolicy::drops_rows`].
    pub fn fill(&self, column: &[Option<f64>]) -> Vec<f64> {
        match self {
            MissingValuePolicy::Zero | MissingValuePolicy::Drop => {
                column.iter().map(|v| v.unwrap_or(0.0)).collect()
            }
            MissingValuePolicy::ForwardFill => {
                let mut last = None;
                column
                    .iter()
                    .map(|v| {
                        if v.is_some() {
                            last = *v;
                        }
                        last.unwrap_or(0.0)
                    })
                    .collect()
            }
        }
    }

    /// Whether rows with undefined values are removed.
    pub fn drops_rows(&self) -> bool {
        matches!(self, MissingValuePolicy::Drop)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MissingValuePolicy::Zero => "zero",
            MissingValuePolicy::ForwardFill => "forward_fill",
            MissingValuePolicy::Drop => "drop",
        }
    }
}
