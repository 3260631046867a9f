//!  Farecast Fare Estimator
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! CLI for flight fare comparison.

use anyhow::{Context, Result};
use clap::Parser;
use farecast_fare_estimator::{
    Comparison, FareEstimator, FareStatus, PriceBand, TripRequest, fmt_day_month, parse_datetime,
};
use std::cmp::max;
use std::path::PathBuf;
use term_size;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "farecast-fares")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Exported fare model (JSON artifact)
    #[arg(short, long, env = "FARECAST_MODEL", default_value = "flight_rf.json")]
    model: PathBuf,

    /// Vocabulary override (JSON)
    #[arg(long, env = "FARECAST_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    /// Origin city (e.g., Delhi, Mumbai)
    #[arg(short, long)]
    from: String,

    /// Destination city (e.g., Cochin, Hyderabad)
    #[arg(short, long)]
    to: String,

    /// Departure (YYYY-MM-DDTHH:MM)
    #[arg(short, long)]
    dep: String,

    /// Arrival (YYYY-MM-DDTHH:MM)
    #[arg(short, long)]
    arr: String,

    /// Number of stops (0 = nonstop)
    #[arg(short, long, default_value = "0")]
    stops: i64,

    /// Lowest acceptable fare
    #[arg(long)]
    min_price: i64,

    /// Highest acceptable fare
    #[arg(long)]
    max_price: i64,

    /// Print the comparison as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

fn status_marker(status: FareStatus) -> &'static str {
    match status {
        FareStatus::VeryCheap => "🟢",
        FareStatus::MeetsExpectation => "✅",
        FareStatus::Expensive => "🔴",
    }
}

/// Render the fare table and the trend to stdout
fn render_results(comparison: &Comparison, request: &TripRequest) {
    let title_bar = format!(
        "================================================================================================\n  🛫  {} → {} on {}\n================================================================================================",
        request.origin, request.destination, comparison.journey_date
    );
    println!("{}\n", title_bar);

    println!("💰 {}", comparison.best_text());
    println!("📊 {}", comparison.status_text());
    println!(
        "🎯 Expected range: ₹{} - ₹{}",
        comparison.price_band.min, comparison.price_band.max
    );

    let airline_width = comparison
        .fares
        .iter()
        .fold(7, |w, q| max(w, q.airline.chars().count()))
        .min(get_terminal_width().saturating_sub(40).max(10));

    println!("\n{}", dash_bar());
    println!(
        "  {:<w$}  {:>12}   STATUS",
        "AIRLINE",
        "FARE (₹)",
        w = airline_width
    );
    println!("{}", dash_bar());
    for quote in &comparison.fares {
        let airline: String = quote.airline.chars().take(airline_width).collect();
        println!(
            "  {:<w$}  {:>12.2}   {} {}",
            airline,
            quote.fare,
            status_marker(quote.status),
            quote.status,
            w = airline_width
        );
    }

    let max_fare = comparison
        .trend
        .iter()
        .map(|p| p.fare)
        .fold(0.0_f64, f64::max);
    let bar_room = get_terminal_width().saturating_sub(50).clamp(10, 40);

    println!("\n📅 {}-day trend:", comparison.trend.len());
    println!("{}", dash_bar());
    for point in &comparison.trend {
        let len = if max_fare > 0.0 {
            ((point.fare / max_fare) * bar_room as f64).round() as usize
        } else {
            0
        };
        let marker = if point.date == comparison.cheapest_day.date {
            " ⬅ cheapest"
        } else {
            ""
        };
        println!(
            "  {}  {:<bw$}  ₹{:.2} ({}){}",
            fmt_day_month(point.date),
            "█".repeat(len),
            point.fare,
            point.airline,
            marker,
            bw = bar_room
        );
    }
    println!("\n🏆 {}", comparison.cheapest_text());
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::debug!("Args: {:?}", args);

    let departure = parse_datetime("dep", &args.dep)?;
    let arrival = parse_datetime("arr", &args.arr)?;
    let request = TripRequest::builder(departure, arrival, args.from.clone(), args.to.clone())
        .stops(args.stops)
        .price_band(PriceBand {
            min: args.min_price,
            max: args.max_price,
        })
        .build();

    tracing::debug!("Parsed request: {:?}", request);

    let estimator = FareEstimator::from_paths(&args.model, args.vocabulary.as_deref())
        .with_context(|| format!("Failed to load fare model from {}", args.model.display()))?;

    let comparison = estimator
        .compare(&request)
        .context("Fare comparison failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&comparison.to_api_response())
            .context("Failed to serialize comparison")?;
        println!("{}", json);
    } else {
        render_results(&comparison, &request);
    }

    Ok(())
}
