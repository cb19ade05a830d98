//! Parallel scenario evaluation.
//!
//! Verifies that thread count never changes results and that every request
//! keeps its position in the output.
//!
//! Run with: cargo test --features parallel --test parallel_scenarios

#![cfg(feature = "parallel")]

use chrono::{Days, NaiveDate};
use event_forecaster::batch::{forecast_scenarios, BatchConfig, ErrorMode};
use event_forecaster::prelude::*;

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + Days::new(offset)
}

fn trained() -> TrainedModel {
    let prices: Vec<PriceRecord> = (0..200)
        .map(|i| PriceRecord::new(day(i), 1900.0 + (i as f64 / 10.0).sin() * 40.0))
        .collect();
    let events: Vec<EventRecord> = (0..20)
        .map(|i| {
            let label = EVENT_CATEGORY_LABELS[(i % 5) as usize];
            EventRecord::new(i, day(i * 9 + 3), label)
        })
        .collect();
    PipelineBuilder::new()
        .build()
        .unwrap()
        .train(&prices, &events)
        .unwrap()
}

fn all_categories(horizon: u32) -> Vec<ForecastRequest> {
    EVENT_CATEGORY_LABELS
        .iter()
        .chain(std::iter::once(&NO_EVENT_LABEL))
        .enumerate()
        .map(|(i, label)| ForecastRequest::new(day(200 + i as u64), *label, horizon))
        .collect()
}

#[test]
fn test_thread_count_does_not_change_results() {
    let model = trained();
    let requests = all_categories(60);
    let config = ForecastConfig::default();

    let single = forecast_scenarios(&model, &config, &requests, &BatchConfig::new().with_threads(1))
        .unwrap();
    let multi = forecast_scenarios(&model, &config, &requests, &BatchConfig::new().with_threads(4))
        .unwrap();

    assert_eq!(single.successful_count(), requests.len());
    assert_eq!(multi.threads_used, 4);
    for (a, b) in single.results.iter().zip(&multi.results) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.forecast, b.forecast);
    }
}

#[test]
fn test_results_keep_request_order() {
    let model = trained();
    let requests = all_categories(5);
    let output = forecast_scenarios(
        &model,
        &ForecastConfig::default(),
        &requests,
        &BatchConfig::new().with_threads(3),
    )
    .unwrap();

    for (i, result) in output.results.iter().enumerate() {
        assert_eq!(result.index, i);
        assert_eq!(result.request, requests[i]);
    }
}

#[test]
fn test_collect_errors_in_parallel() {
    let model = trained();
    let mut requests = all_categories(5);
    requests[2].horizon_days = 0;
    requests[7].event_category = "Unknown".to_string();

    let output = forecast_scenarios(
        &model,
        &ForecastConfig::default(),
        &requests,
        &BatchConfig::new()
            .with_threads(2)
            .with_error_mode(ErrorMode::CollectErrors),
    )
    .unwrap();

    assert_eq!(output.failed_count(), 2);
    let failed: Vec<usize> = output.errors.iter().map(|e| e.index).collect();
    assert_eq!(failed, vec![2, 7]);
}
