//! Feature building for event-conditioned price regression.
//!
//! Joins a price history with an event history by date and derives the
//! per-day feature rows the trainer consumes.
//!
//! # Architecture
//!
//! - `join`: date sorting, duplicate detection, same-day event collapse
//! - `temporal`: lag shift, percentage change, trailing rolling mean
//!
//! # Per-Row Layout
//!
//! | Field | Source |
//! |-------|--------|
//! | `price` | close price |
//! | `change_percent` | source value, else derived from the previous price |
//! | `price_lag1`, `price_lag2` | price shifted 1 and 2 days back |
//! | `event_occurred` | a non-placeholder event record exists for the date |
//! | `encoded_event_type` | [`EncoderState`] code, `-1` without an event |
//! | `encoded_outcome` | sorted outcome index, `-1` without an event |
//! | `rolling_price_mean` | trailing mean of price over the window |
//! | `rolling_change_mean` | trailing mean of change percent over the window |
//! | `event_one_hot` | indicator vector over the frame's fitted codes |
//!
//! Undefined values (warm-up rows, missing changes) are resolved by the
//! configured [`MissingValuePolicy`] as the last step.
//!
//! # Usage
//!
//! ```
//! use event_forecaster::encoding::EventEncoder;
//! use event_forecaster::features::{FeatureBuilder, FeatureConfig};
//! use event_forecaster::records::{EventRecord, PriceRecord};
//! use chrono::{Days, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let prices: Vec<PriceRecord> = (0..10)
//!     .map(|i| PriceRecord::new(start + Days::new(i), 2000.0 + i as f64))
//!     .collect();
//! let events = vec![EventRecord::new(1, start + Days::new(3), "Economic")];
//!
//! let encoder = EventEncoder::default().fit(&events);
//! let frame = FeatureBuilder::new(FeatureConfig::default(), &encoder)
//!     .build(&prices, &events)
//!     .unwrap();
//!
//! assert_eq!(frame.len(), 10);
//! assert_eq!(frame.rows()[3].encoded_event_type, 0);
//! assert_eq!(frame.rows()[4].price_lag1, 2003.0);
//! ```

pub mod join;
pub mod temporal;

use crate::encoding::{EncoderState, OneHotEncoder, OutcomeEncoder, NO_EVENT_CODE};
use crate::error::{ForecastError, Result};
use crate::preprocessing::MissingValuePolicy;
use crate::records::{EventRecord, PriceRecord, NO_EVENT_LABEL};
use crate::schema::EVENT_TYPE_PREFIX;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Configuration for feature building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Trailing window for rolling means, in rows (days with prices)
    pub rolling_window: usize,

    /// Resolution of undefined values
    pub missing: MissingValuePolicy,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            rolling_window: 7,
            missing: MissingValuePolicy::Zero,
        }
    }
}

impl FeatureConfig {
    /// Set the rolling window.
    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }

    /// Set the missing-value policy.
    pub fn with_missing(mut self, policy: MissingValuePolicy) -> Self {
        self.missing = policy;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.rolling_window == 0 {
            return Err("rolling_window must be > 0".to_string());
        }
        Ok(())
    }
}

/// One day of features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub price: f64,
    pub change_percent: f64,
    pub price_lag1: f64,
    pub price_lag2: f64,
    pub event_occurred: bool,
    pub encoded_event_type: i32,
    pub encoded_outcome: i32,
    pub rolling_price_mean: f64,
    pub rolling_change_mean: f64,
    pub event_one_hot: Vec<f64>,
}

/// Date-ordered feature rows plus the one-hot category set they use.
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    rows: Vec<FeatureRow>,
    one_hot: OneHotEncoder,
}

impl FeatureFrame {
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FeatureRow> {
        self.rows
    }

    /// One-hot encoder whose columns every row's `event_one_hot` follows.
    pub fn one_hot(&self) -> &OneHotEncoder {
        &self.one_hot
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent row.
    pub fn last(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }
}

/// Builds [`FeatureFrame`]s from price and event histories.
///
/// Deterministic: identical inputs always give identical frames.
pub struct FeatureBuilder<'a> {
    config: FeatureConfig,
    encoder: &'a EncoderState,
}

impl<'a> FeatureBuilder<'a> {
    /// Create a builder using a fitted event encoder.
    pub fn new(config: FeatureConfig, encoder: &'a EncoderState) -> Self {
        Self { config, encoder }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Build features and fit the one-hot categories on this history.
    ///
    /// Use this at training time.
    pub fn build(&self, prices: &[PriceRecord], events: &[EventRecord]) -> Result<FeatureFrame> {
        let partial = self.build_partial(prices, events)?;
        let one_hot = OneHotEncoder::fit(
            EVENT_TYPE_PREFIX,
            partial.iter().map(|r| r.encoded_event_type),
        );
        Ok(self.finish(partial, one_hot))
    }

    /// Build features with a one-hot category set fixed earlier.
    ///
    /// Codes missing from `one_hot` produce all-zero indicator vectors.
    pub fn build_with_one_hot(
        &self,
        prices: &[PriceRecord],
        events: &[EventRecord],
        one_hot: &OneHotEncoder,
    ) -> Result<FeatureFrame> {
        let partial = self.build_partial(prices, events)?;
        Ok(self.finish(partial, one_hot.clone()))
    }

    fn build_partial(
        &self,
        prices: &[PriceRecord],
        events: &[EventRecord],
    ) -> Result<Vec<PartialRow>> {
        self.config.validate().map_err(ForecastError::Config)?;

        let sorted = join::sorted_prices(prices)?;
        let by_date = join::events_by_date(events);

        let price_values: Vec<f64> = sorted.iter().map(|p| p.price).collect();
        let derived_change = temporal::pct_change(&price_values);
        let change: Vec<Option<f64>> = sorted
            .iter()
            .zip(&derived_change)
            .map(|(p, derived)| p.change_percent.filter(|c| c.is_finite()).or(*derived))
            .collect();

        let lag1 = temporal::shift(&price_values, 1);
        let lag2 = temporal::shift(&price_values, 2);
        let price_opt: Vec<Option<f64>> = price_values.iter().copied().map(Some).collect();
        let rolling_price = temporal::trailing_mean(&price_opt, self.config.rolling_window);
        let rolling_change = temporal::trailing_mean(&change, self.config.rolling_window);

        let matched: Vec<Option<&EventRecord>> = sorted
            .iter()
            .map(|p| by_date.get(&p.date).copied())
            .collect();

        let outcome_label = |ev: Option<&EventRecord>| -> String {
            ev.and_then(|e| e.outcome.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(NO_EVENT_LABEL)
                .to_string()
        };
        let outcome_labels: Vec<String> = matched.iter().map(|ev| outcome_label(*ev)).collect();
        let outcomes = OutcomeEncoder::fit(outcome_labels.iter().map(String::as_str));

        let rows: Vec<PartialRow> = sorted
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let event = matched[i];
                let (occurred, code, outcome) = match event {
                    Some(ev) => (
                        true,
                        self.encoder.encode_event(ev),
                        outcomes.transform(&outcome_labels[i]).unwrap_or(NO_EVENT_CODE),
                    ),
                    None => (false, NO_EVENT_CODE, NO_EVENT_CODE),
                };
                PartialRow {
                    date: p.date,
                    price: p.price,
                    change_percent: change[i],
                    price_lag1: lag1[i],
                    price_lag2: lag2[i],
                    event_occurred: occurred,
                    encoded_event_type: code,
                    encoded_outcome: outcome,
                    rolling_price_mean: rolling_price[i],
                    rolling_change_mean: rolling_change[i],
                }
            })
            .collect();

        log::debug!(
            "Built {} feature rows ({} with events, window {})",
            rows.len(),
            rows.iter().filter(|r| r.event_occurred).count(),
            self.config.rolling_window
        );
        Ok(rows)
    }

    fn finish(&self, partial: Vec<PartialRow>, one_hot: OneHotEncoder) -> FeatureFrame {
        let policy = self.config.missing;
        let column = |f: fn(&PartialRow) -> Option<f64>| -> Vec<Option<f64>> {
            partial.iter().map(f).collect()
        };

        let change = column(|r| r.change_percent);
        let lag1 = column(|r| r.price_lag1);
        let lag2 = column(|r| r.price_lag2);
        let rolling_price = column(|r| r.rolling_price_mean);
        let rolling_change = column(|r| r.rolling_change_mean);

        let filled_change = policy.fill(&change);
        let filled_lag1 = policy.fill(&lag1);
        let filled_lag2 = policy.fill(&lag2);
        let filled_rolling_price = policy.fill(&rolling_price);
        let filled_rolling_change = policy.fill(&rolling_change);

        let mut rows = Vec::with_capacity(partial.len());
        for (i, p) in partial.iter().enumerate() {
            if policy.drops_rows() && !p.is_complete() {
                continue;
            }
            rows.push(FeatureRow {
                date: p.date,
                price: p.price,
                change_percent: filled_change[i],
                price_lag1: filled_lag1[i],
                price_lag2: filled_lag2[i],
                event_occurred: p.event_occurred,
                encoded_event_type: p.encoded_event_type,
                encoded_outcome: p.encoded_outcome,
                rolling_price_mean: filled_rolling_price[i],
                rolling_change_mean: filled_rolling_change[i],
                event_one_hot: one_hot.transform(p.encoded_event_type),
            });
        }

        if rows.len() < partial.len() {
            log::debug!(
                "Missing-value policy '{}' dropped {} rows",
                policy.name(),
                partial.len() - rows.len()
            );
        }

        FeatureFrame { rows, one_hot }
    }
}

/// Feature row before the missing-value policy runs.
struct PartialRow {
    date: NaiveDate,
    price: f64,
    change_percent: Option<f64>,
    price_lag1: Option<f64>,
    price_lag2: Option<f64>,
    event_occurred: bool,
    encoded_event_type: i32,
    encoded_outcome: i32,
    rolling_price_mean: Option<f64>,
    rolling_change_mean: Option<f64>,
}

impl PartialRow {
    fn is_complete(&self) -> bool {
        [
            self.change_percent,
            self.price_lag1,
            self.price_lag2,
            self.rolling_price_mean,
            self.rolling_change_mean,
        ]
        .iter()
        .all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::EventEncoder;
    use chrono::Days;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn prices(values: &[f64]) -> Vec<PriceRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| PriceRecord::new(start() + Days::new(i as u64), v))
            .collect()
    }

    fn build(prices: &[PriceRecord], events: &[EventRecord], config: FeatureConfig) -> FeatureFrame {
        let encoder = EventEncoder::default().fit(events);
        FeatureBuilder::new(config, &encoder)
            .build(prices, events)
            .unwrap()
    }

    #[test]
    fn test_lags_and_zero_fill() {
        let frame = build(&prices(&[10.0, 11.0, 12.0, 13.0]), &[], FeatureConfig::default());
        let rows = frame.rows();
        assert_eq!(rows[0].price_lag1, 0.0);
        assert_eq!(rows[0].price_lag2, 0.0);
        assert_eq!(rows[1].price_lag1, 10.0);
        assert_eq!(rows[1].price_lag2, 0.0);
        assert_eq!(rows[3].price_lag1, 12.0);
        assert_eq!(rows[3].price_lag2, 11.0);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let mut p = prices(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        p.reverse();
        let frame = build(&p, &[], FeatureConfig::default());
        let rows = frame.rows();
        for i in 1..rows.len() {
            assert!(rows[i].date > rows[i - 1].date);
            assert_eq!(rows[i].price_lag1, rows[i - 1].price);
        }
    }

    #[test]
    fn test_rolling_warmup_rows_are_zero() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let frame = build(&prices(&values), &[], FeatureConfig::default());
        let rows = frame.rows();
        assert!(rows[..6].iter().all(|r| r.rolling_price_mean == 0.0));
        assert_eq!(rows[6].rolling_price_mean, 4.0);
        // change[0] undefined, so the first full change window ends at row 7
        assert_eq!(rows[6].rolling_change_mean, 0.0);
        assert!(rows[7].rolling_change_mean > 0.0);
    }

    #[test]
    fn test_change_percent_source_value_kept() {
        let mut p = prices(&[100.0, 110.0]);
        p[1].change_percent = Some(9.5);
        let frame = build(&p, &[], FeatureConfig::default());
        assert_eq!(frame.rows()[1].change_percent, 9.5);
    }

    #[test]
    fn test_change_percent_derived() {
        let frame = build(&prices(&[100.0, 110.0]), &[], FeatureConfig::default());
        assert!((frame.rows()[1].change_percent - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_event_join_and_one_hot() {
        let p = prices(&[1.0, 2.0, 3.0, 4.0]);
        let events = vec![
            EventRecord::new(1, start() + Days::new(1), "Economic").with_outcome("Rate cut"),
            // No price on this date; ignored by the left join
            EventRecord::new(2, start() + Days::new(30), "War"),
        ];
        let frame = build(&p, &events, FeatureConfig::default());
        let rows = frame.rows();

        assert!(rows[1].event_occurred);
        assert_eq!(rows[1].encoded_event_type, 0);
        assert_eq!(frame.one_hot().categories(), &[-1, 0]);
        assert_eq!(rows[1].event_one_hot, vec![0.0, 1.0]);

        for r in rows.iter().filter(|r| !r.event_occurred) {
            assert_eq!(r.encoded_event_type, NO_EVENT_CODE);
            assert_eq!(r.encoded_outcome, NO_EVENT_CODE);
            assert_eq!(r.event_one_hot, vec![1.0, 0.0]);
        }
    }

    #[test]
    fn test_outcome_encoding() {
        let p = prices(&[1.0, 2.0, 3.0]);
        let events = vec![
            EventRecord::new(1, start(), "Economic").with_outcome("Rate cut"),
            EventRecord::new(2, start() + Days::new(2), "Political"),
        ];
        let frame = build(&p, &events, FeatureConfig::default());
        let rows = frame.rows();
        // Sorted labels: "No Event" = 0, "Rate cut" = 1
        assert_eq!(rows[0].encoded_outcome, 1);
        assert_eq!(rows[1].encoded_outcome, NO_EVENT_CODE);
        assert_eq!(rows[2].encoded_outcome, 0);
    }

    #[test]
    fn test_no_event_placeholder_row() {
        let p = prices(&[1.0, 2.0, 3.0]);
        let events = vec![
            EventRecord::new(1, start(), NO_EVENT_LABEL).with_outcome("Quiet day"),
            EventRecord::new(2, start() + Days::new(1), "Economic"),
        ];
        let frame = build(&p, &events, FeatureConfig::default());
        let row = &frame.rows()[0];

        assert!(!row.event_occurred);
        assert_eq!(row.encoded_event_type, NO_EVENT_CODE);
        assert_eq!(row.encoded_outcome, NO_EVENT_CODE);
        assert_eq!(row.event_one_hot, vec![1.0, 0.0]);
        assert!(frame.rows()[1].event_occurred);
    }

    #[test]
    fn test_fixed_one_hot_unseen_code_all_zero() {
        let p = prices(&[1.0, 2.0]);
        let events = vec![EventRecord::new(1, start(), "Economic")];
        let encoder = EventEncoder::default().fit(&events);
        let one_hot = OneHotEncoder::fit(EVENT_TYPE_PREFIX, [NO_EVENT_CODE]);
        let frame = FeatureBuilder::new(FeatureConfig::default(), &encoder)
            .build_with_one_hot(&p, &events, &one_hot)
            .unwrap();
        assert_eq!(frame.rows()[0].event_one_hot, vec![0.0]);
        assert_eq!(frame.rows()[1].event_one_hot, vec![1.0]);
    }

    #[test]
    fn test_drop_policy_removes_warmup() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let config = FeatureConfig::default().with_missing(MissingValuePolicy::Drop);
        let frame = build(&prices(&values), &[], config);
        // change[0] undefined, so rolling change needs rows 1..=7
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.rows()[0].price, 8.0);
        assert_eq!(frame.rows()[0].price_lag1, 7.0);
    }

    #[test]
    fn test_deterministic() {
        let p = prices(&[5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let events = vec![EventRecord::new(1, start() + Days::new(4), "Sports")];
        let a = build(&p, &events, FeatureConfig::default());
        let b = build(&p, &events, FeatureConfig::default());
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    fn test_zero_window_rejected() {
        let encoder = EventEncoder::default().fit(&[]);
        let config = FeatureConfig::default().with_rolling_window(0);
        let err = FeatureBuilder::new(config, &encoder)
            .build(&prices(&[1.0]), &[])
            .unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));
    }
}
