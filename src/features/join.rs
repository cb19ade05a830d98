//! Date join of prices and events.

use crate::error::{ForecastError, Result};
use crate::records::{EventRecord, PriceRecord, NO_EVENT_LABEL};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Sort prices by date, rejecting duplicate dates and non-finite prices.
pub fn sorted_prices(prices: &[PriceRecord]) -> Result<Vec<&PriceRecord>> {
    let mut sorted: Vec<&PriceRecord> = prices.iter().collect();
    sorted.sort_by_key(|p| p.date);

    for (i, pair) in sorted.windows(2).enumerate() {
        if pair[0].date == pair[1].date {
            log::debug!("duplicate price date at sorted position {}", i + 1);
            return Err(ForecastError::duplicate_date("price", pair[1].date));
        }
    }
    if let Some(bad) = sorted.iter().find(|p| !p.price.is_finite()) {
        return Err(ForecastError::data_format(format!(
            "non-finite price {} on {}",
            bad.price, bad.date
        )));
    }

    Ok(sorted)
}

/// Index events by date, keeping the lowest `event_id` when several share
/// a date.
///
/// Records labelled `"No Event"` are placeholders and never match, so their
/// dates join as days without an event.
pub fn events_by_date(events: &[EventRecord]) -> BTreeMap<NaiveDate, &EventRecord> {
    let mut by_date: BTreeMap<NaiveDate, &EventRecord> = BTreeMap::new();
    let mut collapsed = 0usize;

    for event in events
        .iter()
        .filter(|e| e.category_label() != Some(NO_EVENT_LABEL))
    {
        by_date
            .entry(event.date)
            .and_modify(|kept| {
                collapsed += 1;
                if event.event_id < kept.event_id {
                    *kept = event;
                }
            })
            .or_insert(event);
    }

    if collapsed > 0 {
        log::debug!("{collapsed} same-day events collapsed during join");
    }
    by_date
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_sorted_prices_orders_by_date() {
        let prices = vec![
            PriceRecord::new(d(3), 3.0),
            PriceRecord::new(d(1), 1.0),
            PriceRecord::new(d(2), 2.0),
        ];
        let sorted = sorted_prices(&prices).unwrap();
        let values: Vec<f64> = sorted.iter().map(|p| p.price).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_duplicate_price_date_rejected() {
        let prices = vec![PriceRecord::new(d(1), 1.0), PriceRecord::new(d(1), 2.0)];
        let err = sorted_prices(&prices).unwrap_err();
        assert!(err.to_string().contains("2024-01-01"));
    }

    #[test]
    fn test_nan_price_rejected() {
        let prices = vec![PriceRecord::new(d(1), f64::NAN)];
        assert!(matches!(
            sorted_prices(&prices),
            Err(ForecastError::DataFormat(_))
        ));
    }

    #[test]
    fn test_same_day_events_keep_lowest_id() {
        let events = vec![
            EventRecord::new(9, d(5), "War"),
            EventRecord::new(4, d(5), "Economic"),
            EventRecord::new(6, d(5), "Sports"),
        ];
        let by_date = events_by_date(&events);
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[&d(5)].event_id, 4);
    }

    #[test]
    fn test_no_event_placeholders_do_not_match() {
        let events = vec![
            EventRecord::new(1, d(5), NO_EVENT_LABEL),
            EventRecord::new(2, d(6), NO_EVENT_LABEL),
            EventRecord::new(3, d(6), "Economic"),
        ];
        let by_date = events_by_date(&events);
        assert!(!by_date.contains_key(&d(5)));
        assert_eq!(by_date[&d(6)].event_id, 3);
    }
}
