//! Record Validation Module
//!
//! Data-quality checks over price and event histories, run before feature
//! building so bad inputs fail loudly instead of producing a skewed model.
//!
//! # Validation Categories
//!
//! 1. **Price Values**: NaN/Inf detection, non-positive prices
//! 2. **Date Keys**: duplicate price dates
//! 3. **Calendar Gaps**: unusually long stretches without a price
//! 4. **Event Coverage**: events dated outside the price history
//!
//! Errors make [`ValidationResult::into_result`] fail; warnings are only
//! logged by the pipeline.
//!
//! # Usage
//!
//! ```
//! use event_forecaster::records::PriceRecord;
//! use event_forecaster::validation::RecordValidator;
//! use chrono::NaiveDate;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
//! let prices = vec![PriceRecord::new(d(1), 2000.0), PriceRecord::new(d(2), -1.0)];
//!
//! let result = RecordValidator::default().validate_prices(&prices);
//! assert!(result.has_errors());
//! for error in result.errors() {
//!     println!("{error}");
//! }
//! ```

use crate::error::{ForecastError, Result};
use crate::records::{EventRecord, PriceRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Validation result for a single check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Data is valid
    Valid,
    /// Data has minor issues (warnings)
    Warning(String),
    /// Data has serious issues (errors)
    Error(String),
}

impl ValidationLevel {
    /// Check if this result indicates valid data.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationLevel::Valid)
    }

    /// Check if this result is a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationLevel::Warning(_))
    }

    /// Check if this result is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, ValidationLevel::Error(_))
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Valid => write!(f, "Valid"),
            ValidationLevel::Warning(msg) => write!(f, "Warning: {msg}"),
            ValidationLevel::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Aggregated validation result.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    results: Vec<(String, ValidationLevel)>,
}

impl ValidationResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation result.
    pub fn add(&mut self, check_name: &str, level: ValidationLevel) {
        self.results.push((check_name.to_string(), level));
    }

    /// Append every check of `other`.
    pub fn merge(&mut self, other: ValidationResult) {
        self.results.extend(other.results);
    }

    /// Check if all validations passed (no errors or warnings).
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, level)| level.is_valid())
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_error())
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_warning())
    }

    /// Get all warnings as `check: message`.
    pub fn warnings(&self) -> Vec<String> {
        self.messages(ValidationLevel::is_warning)
    }

    /// Get all errors as `check: message`.
    pub fn errors(&self) -> Vec<String> {
        self.messages(ValidationLevel::is_error)
    }

    fn messages(&self, pick: fn(&ValidationLevel) -> bool) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, level)| pick(level))
            .map(|(name, level)| match level {
                ValidationLevel::Warning(msg) | ValidationLevel::Error(msg) => {
                    format!("{name}: {msg}")
                }
                ValidationLevel::Valid => name.clone(),
            })
            .collect()
    }

    /// Get all results.
    pub fn all_results(&self) -> &[(String, ValidationLevel)] {
        &self.results
    }

    /// Get the number of checks performed.
    pub fn check_count(&self) -> usize {
        self.results.len()
    }

    /// Get the number of passed checks.
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, l)| l.is_valid()).count()
    }

    /// Fail with [`ForecastError::DataFormat`] listing every error.
    pub fn into_result(self) -> Result<Self> {
        if self.has_errors() {
            return Err(ForecastError::data_format(self.errors().join("; ")));
        }
        Ok(self)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.passed_count();
        let total = self.check_count();
        writeln!(f, "Validation: {passed}/{total} checks passed")?;

        for (name, level) in &self.results {
            if !level.is_valid() {
                writeln!(f, "  - {name}: {level}")?;
            }
        }

        Ok(())
    }
}

/// Configuration for record validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Longest calendar gap between consecutive prices before warning
    pub max_gap_days: i64,

    /// Warn about events dated outside the price history
    pub check_event_coverage: bool,

    /// Treat warnings as fatal
    pub strict: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_gap_days: 5, // long weekend plus a holiday
            check_event_coverage: true,
            strict: false,
        }
    }
}

impl ValidationConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_gap_days < 1 {
            return Err("max_gap_days must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Validator for price and event histories.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    config: ValidationConfig,
}

impl RecordValidator {
    /// Create a new validator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom configuration.
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a price history.
    pub fn validate_prices(&self, prices: &[PriceRecord]) -> ValidationResult {
        let mut result = ValidationResult::new();

        if prices.is_empty() {
            result.add(
                "price_history",
                ValidationLevel::Error("no price records".to_string()),
            );
            return result;
        }

        self.validate_price_values(prices, &mut result);
        self.validate_unique_dates(prices, &mut result);
        self.validate_gaps(prices, &mut result);

        result
    }

    /// Validate an event history against the price history it joins onto.
    pub fn validate_events(&self, events: &[EventRecord], prices: &[PriceRecord]) -> ValidationResult {
        let mut result = ValidationResult::new();

        let mut ids = HashSet::with_capacity(events.len());
        let duplicates: Vec<u64> = events
            .iter()
            .filter(|e| !ids.insert(e.event_id))
            .map(|e| e.event_id)
            .collect();
        if duplicates.is_empty() {
            result.add("event_ids", ValidationLevel::Valid);
        } else {
            result.add(
                "event_ids",
                ValidationLevel::Error(format!("duplicate event_id(s) {duplicates:?}")),
            );
        }

        let uncategorized = events.iter().filter(|e| e.category_label().is_none()).count();
        if uncategorized > 0 {
            result.add(
                "event_categories",
                ValidationLevel::Warning(format!(
                    "{uncategorized} event(s) without a category encode as no event"
                )),
            );
        }

        if self.config.check_event_coverage {
            let first = prices.iter().map(|p| p.date).min();
            let last = prices.iter().map(|p| p.date).max();
            if let (Some(first), Some(last)) = (first, last) {
                let outside = events
                    .iter()
                    .filter(|e| e.date < first || e.date > last)
                    .count();
                if outside == 0 {
                    result.add("event_coverage", ValidationLevel::Valid);
                } else {
                    result.add(
                        "event_coverage",
                        ValidationLevel::Warning(format!(
                            "{outside} event(s) dated outside {first}..={last} are never joined"
                        )),
                    );
                }
            }
        }

        result
    }

    /// Run both checks and fail on errors (or warnings when strict).
    pub fn check(&self, prices: &[PriceRecord], events: &[EventRecord]) -> Result<ValidationResult> {
        let mut result = self.validate_prices(prices);
        result.merge(self.validate_events(events, prices));

        for warning in result.warnings() {
            log::warn!("{warning}");
        }
        if self.config.strict && result.has_warnings() {
            return Err(ForecastError::data_format(result.warnings().join("; ")));
        }
        result.into_result()
    }

    fn validate_price_values(&self, prices: &[PriceRecord], result: &mut ValidationResult) {
        let mut clean = true;
        for p in prices {
            if !p.price.is_finite() {
                result.add(
                    "price_values",
                    ValidationLevel::Error(format!("non-finite price {} on {}", p.price, p.date)),
                );
                clean = false;
            } else if p.price <= 0.0 {
                result.add(
                    "price_values",
                    ValidationLevel::Error(format!("non-positive price {} on {}", p.price, p.date)),
                );
                clean = false;
            }
        }
        if clean {
            result.add("price_values", ValidationLevel::Valid);
        }
    }

    fn validate_unique_dates(&self, prices: &[PriceRecord], result: &mut ValidationResult) {
        let mut seen = HashSet::with_capacity(prices.len());
        let mut duplicates: Vec<_> = prices
            .iter()
            .filter(|p| !seen.insert(p.date))
            .map(|p| p.date)
            .collect();
        duplicates.sort();
        duplicates.dedup();

        if duplicates.is_empty() {
            result.add("price_dates", ValidationLevel::Valid);
        } else {
            let listed: Vec<String> = duplicates.iter().map(|d| d.to_string()).collect();
            result.add(
                "price_dates",
                ValidationLevel::Error(format!("duplicate date(s) {}", listed.join(", "))),
            );
        }
    }

    fn validate_gaps(&self, prices: &[PriceRecord], result: &mut ValidationResult) {
        let mut dates: Vec<_> = prices.iter().map(|p| p.date).collect();
        dates.sort();

        let longest = dates
            .windows(2)
            .map(|w| ((w[1] - w[0]).num_days(), w[0]))
            .max_by_key(|(days, _)| *days);

        match longest {
            Some((days, from)) if days > self.config.max_gap_days => {
                result.add(
                    "price_gaps",
                    ValidationLevel::Warning(format!(
                        "{days}-day gap after {from} (limit {})",
                        self.config.max_gap_days
                    )),
                );
            }
            _ => result.add("price_gaps", ValidationLevel::Valid),
        }
    }
}
