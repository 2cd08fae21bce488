//! Output formatting and persistence for prediction results.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use tracing::{debug, info};

use crate::api::ChartPoint;
use crate::boundaries::Demographics;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a prediction series using Rust's debug pretty-print format.
pub fn print_pretty(points: &[ChartPoint]) {
    debug!("{:#?}", points);
}

/// Logs a prediction series as pretty-printed JSON.
pub fn print_json(points: &[ChartPoint]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(points)?);
    Ok(())
}

/// Logs one line per crime type, highest probability first.
pub fn log_series(ward: i64, date_of_occurrence: &str, points: &[ChartPoint]) {
    info!(
        ward,
        date_of_occurrence,
        crime_types = points.len(),
        "Prediction received"
    );
    for point in points {
        info!(
            crime_type = %point.crime_type,
            probability_pct = point.probability_pct,
            count = point.count,
            "Crime type"
        );
    }
}

/// Logs a ward's demographic breakdowns.
pub fn log_demographics(ward: i64, demographics: &Demographics) {
    for (group, pct) in demographics.race_breakdown() {
        info!(ward, group, pct, "Race / ethnicity share");
    }
    for (band, pct) in demographics.income_breakdown() {
        info!(ward, band, pct, "Income share");
    }
}

/// One persisted row: the request context plus a single crime type.
#[derive(Debug, Serialize)]
struct PredictionRow<'a> {
    ward: i64,
    date_of_occurrence: &'a str,
    crime_type: &'a str,
    probability_pct: f64,
    count: u64,
}

/// Appends a prediction series to a CSV file, one row per crime type.
///
/// Creates the file with headers if it does not already exist. An empty
/// series is a no-op.
pub fn append_series(
    path: &str,
    ward: i64,
    date_of_occurrence: &str,
    points: &[ChartPoint],
) -> Result<()> {
    // An empty append must not create the file, or the next append
    // would see it existing and skip the header.
    if points.is_empty() {
        return Ok(());
    }

    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending prediction rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for point in points {
        writer.serialize(PredictionRow {
            ward,
            date_of_occurrence,
            crime_type: &point.crime_type,
            probability_pct: point.probability_pct,
            count: point.count,
        })?;
    }
    writer.flush()?;

    Ok(())
}
