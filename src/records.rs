//! Input and output records.
//!
//! Price and event histories are owned by an external store; the pipeline
//! receives them as plain slices of [`PriceRecord`] and [`EventRecord`].
//! [`ForecastRow`] is the only output type handed back to callers.
//!
//! Records coming from text sources carry their dates as strings. The
//! `Raw*` variants hold those strings and convert into the typed records
//! with [`TryFrom`], failing with [`ForecastError::DataFormat`] on malformed
//! dates.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format accepted for string dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Label the dashboard uses for "no event on this date".
pub const NO_EVENT_LABEL: &str = "No Event";

/// Event category labels offered for forecast requests.
pub const EVENT_CATEGORY_LABELS: [&str; 16] = [
    "Political",
    "Disaster",
    "Terrorism",
    "Military Action",
    "Diplomatic/International",
    "Economic",
    "Legislative/Judicial",
    "Legislation",
    "Aviation",
    "Peace Process",
    "Sports",
    "Scientific/Exploration",
    "International Sports Event",
    "Independence",
    "Revolution",
    "Other",
];

/// Parse a `YYYY-MM-DD` date, naming the offending row on failure.
pub fn parse_date(value: &str, row: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        ForecastError::data_format(format!("row {row}: malformed date '{value}': {e}"))
    })
}

/// One day of commodity prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Trading date (unique key)
    pub date: NaiveDate,

    /// Close price
    #[serde(alias = "close")]
    pub price: f64,

    #[serde(default)]
    pub open: Option<f64>,

    #[serde(default)]
    pub high: Option<f64>,

    #[serde(default)]
    pub low: Option<f64>,

    /// Day-over-day change in percent, if the source provides it
    #[serde(default)]
    pub change_percent: Option<f64>,
}

impl PriceRecord {
    /// Create a record with only date and price set.
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price,
            open: None,
            high: None,
            low: None,
            change_percent: None,
        }
    }

    /// Set the source-provided change percent.
    pub fn with_change_percent(mut self, change_percent: f64) -> Self {
        self.change_percent = Some(change_percent);
        self
    }

    /// Set open/high/low.
    pub fn with_ohl(mut self, open: f64, high: f64, low: f64) -> Self {
        self.open = Some(open);
        self.high = Some(high);
        self.low = Some(low);
        self
    }
}

/// A recorded world event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event id
    pub event_id: u64,

    pub date: NaiveDate,

    /// Event category label (e.g. "Economic"); `None` means no category
    #[serde(default)]
    pub category: Option<String>,

    /// Outcome label
    #[serde(default)]
    pub outcome: Option<String>,

    /// Name of the incident
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub source: Option<String>,
}

impl EventRecord {
    /// Create an event with an id, date and category.
    pub fn new(event_id: u64, date: NaiveDate, category: impl Into<String>) -> Self {
        Self {
            event_id,
            date,
            category: Some(category.into()),
            outcome: None,
            name: None,
            country: None,
            source: None,
        }
    }

    /// Set the outcome label.
    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Set the incident name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Category label, treating blank strings as absent.
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One forecasted day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub forecasted_price: f64,
}

/// [`PriceRecord`] with a string date, as read from text sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPriceRecord {
    pub date: String,
    #[serde(alias = "close")]
    pub price: f64,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
}

impl RawPriceRecord {
    /// Convert, naming `row` in any date error.
    pub fn into_record(self, row: usize) -> Result<PriceRecord> {
        Ok(PriceRecord {
            date: parse_date(&self.date, row)?,
            price: self.price,
            open: self.open,
            high: self.high,
            low: self.low,
            change_percent: self.change_percent,
        })
    }
}

impl TryFrom<RawPriceRecord> for PriceRecord {
    type Error = ForecastError;

    fn try_from(raw: RawPriceRecord) -> Result<Self> {
        raw.into_record(0)
    }
}

/// [`EventRecord`] with a string date, as read from text sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEventRecord {
    pub event_id: u64,
    pub date: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl RawEventRecord {
    /// Convert, naming `row` in any date error.
    pub fn into_record(self, row: usize) -> Result<EventRecord> {
        Ok(EventRecord {
            event_id: self.event_id,
            date: parse_date(&self.date, row)?,
            category: self.category,
            outcome: self.outcome,
            name: self.name,
            country: self.country,
            source: self.source,
        })
    }
}

impl TryFrom<RawEventRecord> for EventRecord {
    type Error = ForecastError;

    fn try_from(raw: RawEventRecord) -> Result<Self> {
        raw.into_record(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let d = parse_date("2024-02-29", 0).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_date_malformed_names_row() {
        let err = parse_date("29/02/2024", 7).unwrap_err();
        assert!(matches!(err, ForecastError::DataFormat(_)));
        let msg = err.to_string();
        assert!(msg.contains("row 7"));
        assert!(msg.contains("29/02/2024"));
    }

    #[test]
    fn test_raw_price_conversion() {
        let raw = RawPriceRecord {
            date: "2023-01-05".to_string(),
            price: 1850.5,
            open: Some(1840.0),
            high: None,
            low: None,
            change_percent: None,
        };
        let rec = PriceRecord::try_from(raw).unwrap();
        assert_eq!(rec.price, 1850.5);
        assert_eq!(rec.open, Some(1840.0));
    }

    #[test]
    fn test_price_close_alias() {
        let rec: PriceRecord =
            serde_json::from_str(r#"{"date": "2023-01-05", "close": 1900.0}"#).unwrap();
        assert_eq!(rec.price, 1900.0);
        assert!(rec.change_percent.is_none());
    }

    #[test]
    fn test_blank_category_is_absent() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        let ev = EventRecord::new(1, date, "   ");
        assert!(ev.category_label().is_none());
        let ev = EventRecord::new(2, date, " Economic ");
        assert_eq!(ev.category_label(), Some("Economic"));
    }

    #[test]
    fn test_label_catalogue() {
        assert_eq!(EVENT_CATEGORY_LABELS.len(), 16);
        assert!(!EVENT_CATEGORY_LABELS.contains(&NO_EVENT_LABEL));
    }
}
