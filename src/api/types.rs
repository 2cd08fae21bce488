//! Wire types for the prediction service, plus the chart-ready projection
//! of a response.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Body POSTed to the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub ward: i64,
    pub date_of_occurrence: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Successful prediction payload.
///
/// Probabilities are fractions in `[0, 1]` keyed by crime type; counts are
/// historical occurrence totals. Both maps default to empty so a partial
/// payload still decodes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub crime_types_probability: BTreeMap<String, f64>,
    #[serde(default)]
    pub crime_types_count: BTreeMap<String, u64>,
}

/// One crime type in display form: probability as a percentage alongside
/// the historical count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub crime_type: String,
    pub probability_pct: f64,
    pub count: u64,
}

/// Joins the probability and count maps over the union of their keys.
///
/// A crime type missing from one map contributes zero on that side, so a
/// lopsided payload never drops a row. Probabilities are scaled to percent.
/// Rows come back sorted by descending probability, ties by name.
pub fn adapt(response: &PredictionResponse) -> Vec<ChartPoint> {
    let crime_types: BTreeSet<&String> = response
        .crime_types_probability
        .keys()
        .chain(response.crime_types_count.keys())
        .collect();

    let mut points: Vec<ChartPoint> = crime_types
        .into_iter()
        .map(|crime_type| ChartPoint {
            crime_type: crime_type.clone(),
            probability_pct: response
                .crime_types_probability
                .get(crime_type)
                .copied()
                .unwrap_or(0.0)
                * 100.0,
            count: response
                .crime_types_count
                .get(crime_type)
                .copied()
                .unwrap_or(0),
        })
        .collect();

    points.sort_by(|a, b| {
        b.probability_pct
            .partial_cmp(&a.probability_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.crime_type.cmp(&b.crime_type))
    });
    points
}
