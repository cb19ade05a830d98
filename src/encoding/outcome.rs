//! Outcome label encoder.

use std::collections::BTreeMap;

/// Maps outcome labels to indices of the sorted distinct label set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeEncoder {
    labels: BTreeMap<String, i32>,
}

impl OutcomeEncoder {
    /// Fit on the labels seen in history.
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sorted: BTreeMap<String, i32> = labels
            .into_iter()
            .map(|l| (l.to_string(), 0))
            .collect();
        for (i, code) in sorted.values_mut().enumerate() {
            *code = i as i32;
        }
        Self { labels: sorted }
    }

    /// Index of `label`, or `None` if it was not seen at fit time.
    pub fn transform(&self, label: &str) -> Option<i32> {
        self.labels.get(label).copied()
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_indices() {
        let enc = OutcomeEncoder::fit(["Resolved", "Casualties", "No Event", "Resolved"]);
        assert_eq!(enc.len(), 3);
        assert_eq!(enc.transform("Casualties"), Some(0));
        assert_eq!(enc.transform("No Event"), Some(1));
        assert_eq!(enc.transform("Resolved"), Some(2));
        assert_eq!(enc.transform("Unknown"), None);
    }

    #[test]
    fn test_empty() {
        let enc = OutcomeEncoder::fit(std::iter::empty());
        assert!(enc.is_empty());
    }
}
