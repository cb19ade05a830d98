//! Scenario Sweep Demo
//!
//! Trains once, then forecasts every event category in parallel and ranks
//! the categories by their price impact on the event date.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release --features parallel --example scenario_sweep -- prices.json events.json
//! ```

use chrono::Days;
use event_forecaster::batch::{forecast_scenarios, BatchConfig, ErrorMode};
use event_forecaster::prelude::*;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <prices.json> <events.json> [horizon_days]", args[0]);
        std::process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2], args.get(3)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(prices: &str, events: &str, horizon: Option<&String>) -> Result<()> {
    let horizon: u32 = match horizon {
        Some(raw) => raw
            .parse()
            .map_err(|e| ForecastError::validation(format!("bad horizon '{raw}': {e}")))?,
        None => 30,
    };

    let pipeline = PipelineBuilder::new().build()?;
    let source = JsonFileSource::new(prices, events);
    let trained = pipeline.train(&source.fetch_prices()?, &source.fetch_events()?)?;

    let event_date = trained.last_known_date + Days::new(7);
    let requests: Vec<ForecastRequest> = EVENT_CATEGORY_LABELS
        .iter()
        .chain(std::iter::once(&NO_EVENT_LABEL))
        .map(|label| ForecastRequest::new(event_date, *label, horizon))
        .collect();

    let batch = BatchConfig::new().with_error_mode(ErrorMode::CollectErrors);
    let output = forecast_scenarios(&trained, &pipeline.config().forecast, &requests, &batch)?;

    let baseline = output
        .results
        .iter()
        .find(|r| r.request.event_category == NO_EVENT_LABEL)
        .and_then(|r| r.price_on_event_date())
        .unwrap_or(trained.last_known_price);

    let mut ranked: Vec<(String, f64)> = output
        .results
        .iter()
        .filter_map(|r| {
            r.price_on_event_date()
                .map(|p| (r.request.event_category.clone(), p - baseline))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    println!(
        "Event date {event_date}, baseline {baseline:.2}, {} scenarios in {:?} on {} threads",
        output.successful_count(),
        output.elapsed,
        output.threads_used
    );
    for (category, delta) in &ranked {
        println!("{category:<28} {delta:>+10.2}");
    }
    for failure in &output.errors {
        eprintln!("{}: {}", failure.request.event_category, failure.error);
    }

    Ok(())
}
