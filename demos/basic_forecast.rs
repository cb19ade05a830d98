//! Basic Forecast Demo
//!
//! Trains on a price/event history and prints a forecast path for one
//! hypothetical event.
//!
//! # Usage
//!
//! ```bash
//! # Synthetic history
//! cargo run --example basic_forecast
//!
//! # JSON files and a category
//! RUST_LOG=info cargo run --example basic_forecast -- prices.json events.json Economic 2025-07-01 30
//!
//! # Write the default configuration
//! cargo run --example basic_forecast -- --generate-config forecast.toml
//! ```

use chrono::{Days, NaiveDate};
use event_forecaster::prelude::*;
use event_forecaster::records::parse_date;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() == 3 && args[1] == "--generate-config" {
        match PipelineConfig::default().save_toml(&args[2]) {
            Ok(()) => println!("Wrote default configuration to {}", args[2]),
            Err(e) => {
                eprintln!("Failed to write {}: {e}", args[2]);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run(&args[1..]) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let pipeline = PipelineBuilder::new()
        .experiment("basic_forecast", "Demo run")
        .build()?;

    let (prices, events) = match args {
        [prices, events, ..] => {
            let source = JsonFileSource::new(prices, events);
            (source.fetch_prices()?, source.fetch_events()?)
        }
        _ => synthetic_history(),
    };

    let trained = pipeline.train(&prices, &events)?;
    println!(
        "Trained on {} rows, held-out RMSE {:.4} ({} rows)",
        trained.metrics.train_rows, trained.metrics.rmse, trained.metrics.test_rows
    );
    println!(
        "Last known price {:.2} on {}",
        trained.last_known_price, trained.last_known_date
    );

    let category = args.get(2).map(String::as_str).unwrap_or("Economic");
    let event_date = match args.get(3) {
        Some(raw) => parse_date(raw, 0)?,
        None => trained.last_known_date + Days::new(14),
    };
    let horizon = match args.get(4) {
        Some(raw) => raw
            .parse()
            .map_err(|e| ForecastError::validation(format!("bad horizon '{raw}': {e}")))?,
        None => 30,
    };

    let request = ForecastRequest::new(event_date, category, horizon);
    let path = pipeline.forecast(&trained, &request)?;
    let baseline = pipeline.forecast(
        &trained,
        &ForecastRequest::new(event_date, NO_EVENT_LABEL, horizon),
    )?;

    println!("\n{:<12} {:>14} {:>14}", "date", category, NO_EVENT_LABEL);
    for (row, base) in path.iter().zip(&baseline) {
        let marker = if row.date == event_date { " <- event" } else { "" };
        println!(
            "{:<12} {:>14.2} {:>14.2}{marker}",
            row.date.to_string(),
            row.forecasted_price,
            base.forecasted_price
        );
    }

    Ok(())
}

/// Two years of drifting prices with a handful of categorized events.
fn synthetic_history() -> (Vec<PriceRecord>, Vec<EventRecord>) {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default();
    let mut price = 1820.0;
    let mut prices = Vec::new();
    let mut events = Vec::new();

    for i in 0..730u64 {
        let date = start + Days::new(i);
        let category = match i % 37 {
            0 => Some("Economic"),
            11 => Some("Political"),
            23 => Some("Military Action"),
            _ => None,
        };
        let shock = match category {
            Some("Military Action") => 0.012,
            Some("Economic") => -0.004,
            _ => 0.0,
        };
        price *= 1.0 + 0.0003 + shock + ((i * 7919 % 97) as f64 - 48.0) / 20_000.0;
        prices.push(PriceRecord::new(date, price));

        if let Some(label) = category {
            events.push(EventRecord::new(events.len() as u64, date, label));
        }
    }

    (prices, events)
}
