//! One-hot encoding of event codes.

use serde::{Deserialize, Serialize};

/// Indicator encoder with a category set frozen at fit time.
///
/// Categories are kept sorted, so the column order depends only on the set
/// of codes seen, not on the order they appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    prefix: String,
    categories: Vec<i32>,
}

impl OneHotEncoder {
    /// Fit on the codes present in training data.
    pub fn fit(prefix: impl Into<String>, codes: impl IntoIterator<Item = i32>) -> Self {
        let mut categories: Vec<i32> = codes.into_iter().collect();
        categories.sort_unstable();
        categories.dedup();
        Self {
            prefix: prefix.into(),
            categories,
        }
    }

    /// Fitted categories, ascending.
    pub fn categories(&self) -> &[i32] {
        &self.categories
    }

    /// Number of indicator columns.
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Column name for a category, e.g. `event_type_-1`.
    pub fn column_name(&self, code: i32) -> String {
        format!("{}_{}", self.prefix, code)
    }

    /// Column names in category order.
    pub fn column_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|&c| self.column_name(c))
            .collect()
    }

    /// Position of a code's column, if the code was seen at fit time.
    pub fn position(&self, code: i32) -> Option<usize> {
        self.categories.binary_search(&code).ok()
    }

    /// Indicator vector for `code`; all zeros when the code is unseen.
    pub fn transform(&self, code: i32) -> Vec<f64> {
        let mut out = vec![0.0; self.width()];
        if let Some(pos) = self.position(code) {
            out[pos] = 1.0;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_dedup_categories() {
        let enc = OneHotEncoder::fit("event_type", [3, -1, 0, 3, -1]);
        assert_eq!(enc.categories(), &[-1, 0, 3]);
        assert_eq!(
            enc.column_names(),
            vec!["event_type_-1", "event_type_0", "event_type_3"]
        );
    }

    #[test]
    fn test_exactly_one_hot() {
        let enc = OneHotEncoder::fit("event_type", [-1, 0, 1]);
        let v = enc.transform(0);
        assert_eq!(v, vec![0.0, 1.0, 0.0]);
        assert_eq!(v.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_unseen_is_all_zero() {
        let enc = OneHotEncoder::fit("event_type", [-1, 0]);
        assert_eq!(enc.transform(7), vec![0.0, 0.0]);
    }
}
