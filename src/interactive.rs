//! Interactive prompt loop for building and running predictions.
//!
//! Prompts for a location, shows the resolved ward with its demographics,
//! then a date and time window, and calls the prediction service. Repeats
//! until the user quits.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use dialoguer::{Confirm, Input, Select};
use tracing::error;

use ward_predictor::api::{ChartPoint, PredictClient, PredictionApi, adapt};
use ward_predictor::boundaries::{BoundaryStore, Demographics};
use ward_predictor::geometry::GeoPoint;
use ward_predictor::resolve::WardResolver;
use ward_predictor::session::Selection;
use ward_predictor::timebucket::TimeBucket;

/// Chicago city center, the starting point for the location prompt.
const DEFAULT_LATITUDE: f64 = 41.8781;
const DEFAULT_LONGITUDE: f64 = -87.6298;

/// Runs the prompt loop against a loaded boundary store.
///
/// Service errors are reported and the loop continues; only prompt I/O
/// failures end it early.
pub async fn run(
    store: &BoundaryStore,
    resolver: &WardResolver,
    default_endpoint: &str,
) -> Result<()> {
    println!("Wards loaded: {}", store.len());

    let endpoint: String = Input::new()
        .with_prompt("Prediction service URL")
        .default(default_endpoint.to_string())
        .interact_text()?;
    let client = PredictClient::new(&endpoint)?;

    loop {
        let mut selection = Selection::new();

        let point = prompt_point()?;
        match selection.select_point(point, resolver) {
            Some(ward) => {
                println!("Resolved to ward {ward}");
                if let Some(demographics) = store.demographics(ward) {
                    render_demographics(demographics);
                }
            }
            None => {
                println!("That point is outside every ward boundary.");
                if !prompt_again()? {
                    break;
                }
                continue;
            }
        }

        selection.select_when(prompt_date()?, prompt_bucket()?);
        let request = selection.request()?;

        let send = Confirm::new()
            .with_prompt(format!(
                "Request prediction for ward {} at {}?",
                request.ward, request.date_of_occurrence
            ))
            .default(true)
            .interact()?;

        if send {
            match client.predict(&request).await {
                Ok(response) => render_series(&adapt(&response)),
                Err(e) => {
                    error!(error = %e, "Prediction failed");
                    println!("Prediction failed: {e}");
                }
            }
        }

        if !prompt_again()? {
            break;
        }
    }

    Ok(())
}

/// Prompts for a coordinate pair until it passes range validation.
fn prompt_point() -> Result<GeoPoint> {
    loop {
        let latitude: f64 = Input::new()
            .with_prompt("Latitude")
            .default(DEFAULT_LATITUDE)
            .interact_text()?;
        let longitude: f64 = Input::new()
            .with_prompt("Longitude")
            .default(DEFAULT_LONGITUDE)
            .interact_text()?;

        match GeoPoint::new(latitude, longitude) {
            Ok(point) => return Ok(point),
            Err(e) => println!("{e}"),
        }
    }
}

fn prompt_date() -> Result<NaiveDate> {
    let date: NaiveDate = Input::new()
        .with_prompt("Date (YYYY-MM-DD)")
        .default(Local::now().date_naive())
        .interact_text()?;
    Ok(date)
}

fn prompt_bucket() -> Result<TimeBucket> {
    let labels: Vec<&str> = TimeBucket::ALL.iter().map(|b| b.label()).collect();
    let current = TimeBucket::for_time(Local::now().time());
    let default = TimeBucket::ALL
        .iter()
        .position(|b| *b == current)
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Time window")
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(TimeBucket::ALL[idx])
}

fn prompt_again() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Run another prediction?")
        .default(true)
        .interact()?)
}

fn render_demographics(demographics: &Demographics) {
    println!("Race / ethnicity:");
    for (group, pct) in demographics.race_breakdown() {
        println!("  {group:<10} {pct:>5.1}%");
    }
    println!("Household income:");
    for (band, pct) in demographics.income_breakdown() {
        println!("  {band:<14} {pct:>5.1}%");
    }
}

fn render_series(points: &[ChartPoint]) {
    if points.is_empty() {
        println!("The service returned no crime types.");
        return;
    }

    println!("{:<22} {:>12} {:>8}", "CRIME TYPE", "PROBABILITY", "COUNT");
    println!("{}", "-".repeat(44));
    for point in points {
        println!(
            "{:<22} {:>11.1}% {:>8}",
            point.crime_type, point.probability_pct, point.count
        );
    }
}
