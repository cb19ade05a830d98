//! Price and event providers.
//!
//! The pipeline never fetches data itself; it asks a [`PriceSource`] and an
//! [`EventSource`] for already-materialized records. This keeps the core
//! testable with in-memory fixtures and lets the acquisition job live
//! elsewhere.
//!
//! - [`InMemorySource`]: records held in memory (tests, callers that fetched
//!   data themselves)
//! - [`JsonFileSource`]: JSON arrays of records on disk, dates as
//!   `YYYY-MM-DD` strings

use crate::error::Result;
use crate::records::{EventRecord, PriceRecord, RawEventRecord, RawPriceRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// Provides a price history.
pub trait PriceSource {
    /// Fetch every available price record.
    fn fetch_prices(&self) -> Result<Vec<PriceRecord>>;

    /// Short name for logging.
    fn name(&self) -> &str;
}

/// Provides an event history.
pub trait EventSource {
    /// Fetch every available event record.
    fn fetch_events(&self) -> Result<Vec<EventRecord>>;

    /// Short name for logging.
    fn name(&self) -> &str;
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    prices: Vec<PriceRecord>,
    events: Vec<EventRecord>,
}

impl InMemorySource {
    pub fn new(prices: Vec<PriceRecord>, events: Vec<EventRecord>) -> Self {
        Self { prices, events }
    }
}

impl PriceSource for InMemorySource {
    fn fetch_prices(&self) -> Result<Vec<PriceRecord>> {
        Ok(self.prices.clone())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

impl EventSource for InMemorySource {
    fn fetch_events(&self) -> Result<Vec<EventRecord>> {
        Ok(self.events.clone())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

/// JSON files holding arrays of price and event records.
///
/// Either path may be absent; a missing events file yields no events, a
/// missing prices file yields no prices.
#[derive(Debug, Clone, Default)]
pub struct JsonFileSource {
    prices_path: Option<PathBuf>,
    events_path: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new(prices_path: impl AsRef<Path>, events_path: impl AsRef<Path>) -> Self {
        Self {
            prices_path: Some(prices_path.as_ref().to_path_buf()),
            events_path: Some(events_path.as_ref().to_path_buf()),
        }
    }

    /// Prices only; the event history is empty.
    pub fn prices_only(prices_path: impl AsRef<Path>) -> Self {
        Self {
            prices_path: Some(prices_path.as_ref().to_path_buf()),
            events_path: None,
        }
    }

    fn read_array<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl PriceSource for JsonFileSource {
    fn fetch_prices(&self) -> Result<Vec<PriceRecord>> {
        let Some(path) = &self.prices_path else {
            return Ok(Vec::new());
        };
        let raw: Vec<RawPriceRecord> = Self::read_array(path)?;
        let prices = raw
            .into_iter()
            .enumerate()
            .map(|(row, r)| r.into_record(row))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("Loaded {} price records from {}", prices.len(), path.display());
        Ok(prices)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

impl EventSource for JsonFileSource {
    fn fetch_events(&self) -> Result<Vec<EventRecord>> {
        let Some(path) = &self.events_path else {
            return Ok(Vec::new());
        };
        let raw: Vec<RawEventRecord> = Self::read_array(path)?;
        let events = raw
            .into_iter()
            .enumerate()
            .map(|(row, r)| r.into_record(row))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("Loaded {} event records from {}", events.len(), path.display());
        Ok(events)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
