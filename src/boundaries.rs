//! Ward boundary dataset: one CSV row per ward carrying a WKT geometry
//! plus demographic percentage columns.

use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

use crate::error::DataLoadError;
use crate::geometry;

/// One row of the boundary CSV, column names as shipped by the data portal.
/// Extra columns in the file are ignored.
#[derive(Debug, Deserialize)]
struct RawWardRecord {
    #[serde(rename = "Ward")]
    ward: i64,
    #[serde(rename = "the_geom")]
    the_geom: String,
    #[serde(rename = "Race-White_pct")]
    race_white_pct: f64,
    #[serde(rename = "Race-Black_pct")]
    race_black_pct: f64,
    #[serde(rename = "Race-Asian_pct")]
    race_asian_pct: f64,
    #[serde(rename = "Ethnicity-Hispanic_pct")]
    ethnicity_hispanic_pct: f64,
    #[serde(rename = "Income-24999_minus_pct")]
    income_under_25k_pct: f64,
    #[serde(rename = "Income-25000-49999_pct")]
    income_25k_to_50k_pct: f64,
    #[serde(rename = "Income-50000-99999_pct")]
    income_50k_to_100k_pct: f64,
    #[serde(rename = "Income-100000-149999_pct")]
    income_100k_to_150k_pct: f64,
    #[serde(rename = "Income-150000_plus_pct")]
    income_150k_plus_pct: f64,
}

impl RawWardRecord {
    fn demographics(&self) -> Demographics {
        Demographics {
            race_white_pct: self.race_white_pct,
            race_black_pct: self.race_black_pct,
            race_asian_pct: self.race_asian_pct,
            ethnicity_hispanic_pct: self.ethnicity_hispanic_pct,
            income_under_25k_pct: self.income_under_25k_pct,
            income_25k_to_50k_pct: self.income_25k_to_50k_pct,
            income_50k_to_100k_pct: self.income_50k_to_100k_pct,
            income_100k_to_150k_pct: self.income_100k_to_150k_pct,
            income_150k_plus_pct: self.income_150k_plus_pct,
        }
    }
}

/// Share-of-population percentages for one ward. Values are in `[0, 100]`
/// as published; race and income groups are not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Demographics {
    pub race_white_pct: f64,
    pub race_black_pct: f64,
    pub race_asian_pct: f64,
    pub ethnicity_hispanic_pct: f64,
    pub income_under_25k_pct: f64,
    pub income_25k_to_50k_pct: f64,
    pub income_50k_to_100k_pct: f64,
    pub income_100k_to_150k_pct: f64,
    pub income_150k_plus_pct: f64,
}

impl Demographics {
    /// Race and ethnicity shares with display labels, in dataset order.
    pub fn race_breakdown(&self) -> [(&'static str, f64); 4] {
        [
            ("White", self.race_white_pct),
            ("Black", self.race_black_pct),
            ("Asian", self.race_asian_pct),
            ("Hispanic", self.ethnicity_hispanic_pct),
        ]
    }

    /// Household income bands with display labels, lowest band first.
    pub fn income_breakdown(&self) -> [(&'static str, f64); 5] {
        [
            ("< $25k", self.income_under_25k_pct),
            ("$25k - $50k", self.income_25k_to_50k_pct),
            ("$50k - $100k", self.income_50k_to_100k_pct),
            ("$100k - $150k", self.income_100k_to_150k_pct),
            ("$150k +", self.income_150k_plus_pct),
        ]
    }
}

/// A ward with its parsed boundary and demographics.
#[derive(Debug, Clone)]
pub struct WardBoundary {
    pub ward: i64,
    pub polygon: MultiPolygon<f64>,
    pub demographics: Demographics,
}

/// All ward boundaries from one dataset file, kept in file order.
///
/// Loading is strict: any unreadable row fails the whole load, since a
/// store with silently missing wards would misresolve points.
#[derive(Debug, Default)]
pub struct BoundaryStore {
    wards: Vec<WardBoundary>,
    index: BTreeMap<i64, usize>,
}

impl BoundaryStore {
    /// Loads the boundary CSV at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError`] if the file cannot be opened, a row fails
    /// CSV deserialization, a geometry fails to parse as (MULTI)POLYGON
    /// WKT, or a ward id appears twice.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Loads boundary CSV data from any reader. See [`BoundaryStore::load`].
    pub fn from_reader(reader: impl io::Read) -> Result<Self, DataLoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut wards: Vec<WardBoundary> = Vec::new();
        let mut index = BTreeMap::new();

        for row in csv_reader.deserialize::<RawWardRecord>() {
            let record = row?;
            let polygon = geometry::multipolygon_from_wkt(&record.the_geom).map_err(|source| {
                DataLoadError::Geometry {
                    ward: record.ward,
                    source,
                }
            })?;
            if index.insert(record.ward, wards.len()).is_some() {
                return Err(DataLoadError::Duplicate(record.ward));
            }
            wards.push(WardBoundary {
                ward: record.ward,
                polygon,
                demographics: record.demographics(),
            });
        }

        Ok(Self { wards, index })
    }

    pub fn len(&self) -> usize {
        self.wards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wards.is_empty()
    }

    /// Wards in file order.
    pub fn iter(&self) -> impl Iterator<Item = &WardBoundary> {
        self.wards.iter()
    }

    /// Ward ids in ascending order, independent of file order.
    pub fn ward_ids(&self) -> Vec<i64> {
        self.index.keys().copied().collect()
    }

    pub fn get(&self, ward: i64) -> Option<&WardBoundary> {
        self.index.get(&ward).map(|&position| &self.wards[position])
    }

    pub fn demographics(&self, ward: i64) -> Option<&Demographics> {
        self.get(ward).map(|boundary| &boundary.demographics)
    }
}
