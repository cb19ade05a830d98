//! Event category encoder.

use crate::records::{EventRecord, NO_EVENT_LABEL};
use std::collections::HashMap;

/// Code for "no event on this date".
pub const NO_EVENT_CODE: i32 = -1;

/// Default number of categories that get their own code.
pub const DEFAULT_TOP_K: usize = 15;

/// Largest accepted K.
pub const MAX_TOP_K: usize = 4096;

/// Unfitted event encoder.
///
/// [`EventEncoder::fit`] consumes the encoder and returns an immutable
/// [`EncoderState`]. There is no way to refit a state, so the code mapping
/// seen at training time is the one used at inference.
#[derive(Debug, Clone)]
pub struct EventEncoder {
    top_k: usize,
}

impl Default for EventEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl EventEncoder {
    /// Create an encoder keeping the `top_k` most frequent categories.
    ///
    /// K is capped at [`MAX_TOP_K`] so every code fits an `i32`.
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k: top_k.min(MAX_TOP_K),
        }
    }

    /// Configured K.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Rank categories by frequency and freeze the mapping.
    ///
    /// Ties keep the order in which categories were first encountered.
    /// Events without a category do not count.
    pub fn fit(self, events: &[EventRecord]) -> EncoderState {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for label in events.iter().filter_map(EventRecord::category_label) {
            if label == NO_EVENT_LABEL {
                continue;
            }
            let count = counts.entry(label).or_insert(0);
            if *count == 0 {
                order.push(label);
            }
            *count += 1;
        }

        // Stable sort keeps encounter order among equal counts
        let mut ranked = order;
        ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));
        ranked.truncate(self.top_k);

        let categories: Vec<String> = ranked.into_iter().map(str::to_string).collect();
        let codes = categories
            .iter()
            .enumerate()
            .map(|(rank, label)| (label.clone(), rank as i32))
            .collect();

        log::debug!(
            "Event encoder fitted: {} distinct categories, {} coded, overflow code {}",
            counts.len(),
            categories.len(),
            self.top_k
        );

        EncoderState {
            top_k: self.top_k,
            categories,
            codes,
        }
    }
}

/// Fitted, immutable category → code mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderState {
    top_k: usize,
    categories: Vec<String>,
    codes: HashMap<String, i32>,
}

impl EncoderState {
    /// Encode a category label.
    ///
    /// `None`, blank labels and `"No Event"` give [`NO_EVENT_CODE`]; labels
    /// outside the top K give the overflow code. Never fails.
    pub fn encode(&self, category: Option<&str>) -> i32 {
        let label = match category.map(str::trim) {
            None | Some("") => return NO_EVENT_CODE,
            Some(l) if l == NO_EVENT_LABEL => return NO_EVENT_CODE,
            Some(l) => l,
        };
        self.codes
            .get(label)
            .copied()
            .unwrap_or_else(|| self.overflow_code())
    }

    /// Encode an event record's category.
    pub fn encode_event(&self, event: &EventRecord) -> i32 {
        self.encode(event.category_label())
    }

    /// Code of a category if it is one of the top K.
    pub fn code_of(&self, label: &str) -> Option<i32> {
        self.codes.get(label).copied()
    }

    /// Overflow ("other") code, always K.
    pub fn overflow_code(&self) -> i32 {
        self.top_k as i32
    }

    /// Configured K.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Coded categories in rank order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn events(labels: &[&str]) -> Vec<EventRecord> {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| EventRecord::new(i as u64 + 1, base + chrono::Days::new(i as u64), *l))
            .collect()
    }

    #[test]
    fn test_rank_by_frequency() {
        let evs = events(&["War", "Economic", "Economic", "Political", "Economic", "War"]);
        let state = EventEncoder::new(15).fit(&evs);
        assert_eq!(state.categories(), &["Economic", "War", "Political"]);
        assert_eq!(state.encode(Some("Economic")), 0);
        assert_eq!(state.encode(Some("War")), 1);
        assert_eq!(state.encode(Some("Political")), 2);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let evs = events(&["Sports", "Aviation", "Revolution", "Aviation", "Sports"]);
        let state = EventEncoder::new(15).fit(&evs);
        assert_eq!(state.categories(), &["Sports", "Aviation", "Revolution"]);
    }

    #[test]
    fn test_overflow_for_tail_and_unseen() {
        let evs = events(&["A", "A", "A", "B", "B", "C"]);
        let state = EventEncoder::new(2).fit(&evs);
        assert_eq!(state.overflow_code(), 2);
        assert_eq!(state.encode(Some("C")), 2);
        assert_eq!(state.encode(Some("Never Seen")), 2);
    }

    #[test]
    fn test_overflow_code_is_k_even_with_few_categories() {
        let evs = events(&["A"]);
        let state = EventEncoder::new(15).fit(&evs);
        assert_eq!(state.encode(Some("Z")), 15);
    }

    #[test]
    fn test_no_event_forms() {
        let state = EventEncoder::default().fit(&events(&["A"]));
        assert_eq!(state.encode(None), NO_EVENT_CODE);
        assert_eq!(state.encode(Some("")), NO_EVENT_CODE);
        assert_eq!(state.encode(Some(NO_EVENT_LABEL)), NO_EVENT_CODE);
    }

    #[test]
    fn test_no_event_label_not_counted() {
        let evs = events(&[NO_EVENT_LABEL, NO_EVENT_LABEL, "A"]);
        let state = EventEncoder::default().fit(&evs);
        assert_eq!(state.categories(), &["A"]);
    }

    #[test]
    fn test_refit_is_stable() {
        let evs = events(&["X", "Y", "Y", "Z", "X", "W"]);
        let a = EventEncoder::new(3).fit(&evs);
        let b = EventEncoder::new(3).fit(&evs);
        assert_eq!(a, b);
    }

    #[test]
    fn test_huge_k_is_capped() {
        let encoder = EventEncoder::new(usize::MAX);
        assert_eq!(encoder.top_k(), MAX_TOP_K);
        let state = encoder.fit(&events(&["A"]));
        assert_eq!(state.encode(Some("Z")), MAX_TOP_K as i32);
        assert!(state.overflow_code() > 0);
    }

    #[test]
    fn test_encode_is_idempotent() {
        let state = EventEncoder::default().fit(&events(&["A", "B"]));
        let first = state.encode(Some("B"));
        for _ in 0..5 {
            assert_eq!(state.encode(Some("B")), first);
        }
    }
}
