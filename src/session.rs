//! Explicit selection state for one prediction flow.
//!
//! A [`Selection`] accumulates what the user has picked so far and is
//! passed to whatever needs it; completing it yields the wire request.

use chrono::NaiveDate;

use crate::api::{self, PredictionRequest};
use crate::error::PredictionError;
use crate::geometry::GeoPoint;
use crate::resolve::WardResolver;
use crate::timebucket::TimeBucket;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection {
    point: Option<GeoPoint>,
    ward: Option<i64>,
    date: Option<NaiveDate>,
    bucket: Option<TimeBucket>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the location and re-resolves the ward through `resolver`.
    ///
    /// The previous ward is always replaced: a point outside every boundary
    /// clears it to `None` rather than keeping a stale hit.
    pub fn select_point(&mut self, point: GeoPoint, resolver: &WardResolver) -> Option<i64> {
        self.point = Some(point);
        self.ward = resolver.resolve(&point);
        self.ward
    }

    pub fn select_when(&mut self, date: NaiveDate, bucket: TimeBucket) {
        self.date = Some(date);
        self.bucket = Some(bucket);
    }

    pub fn point(&self) -> Option<GeoPoint> {
        self.point
    }

    pub fn ward(&self) -> Option<i64> {
        self.ward
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn bucket(&self) -> Option<TimeBucket> {
        self.bucket
    }

    pub fn is_complete(&self) -> bool {
        self.ward.is_some() && self.point.is_some() && self.date.is_some() && self.bucket.is_some()
    }

    /// Builds the wire request, deriving the timestamp from the selected
    /// date and bucket at call time.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::IncompleteSelection`] naming the first
    /// missing piece.
    pub fn request(&self) -> Result<PredictionRequest, PredictionError> {
        let date = self
            .date
            .ok_or(PredictionError::IncompleteSelection("no date selected"))?;
        let bucket = self.bucket.ok_or(PredictionError::IncompleteSelection(
            "no time window selected",
        ))?;
        api::build_request(self.ward, self.point, bucket.midpoint(date))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundaries::BoundaryStore;

    const HEADER: &str = "the_geom,Ward,Race-White_pct,Race-Black_pct,Race-Asian_pct,Ethnicity-Hispanic_pct,Income-24999_minus_pct,Income-25000-49999_pct,Income-50000-99999_pct,Income-100000-149999_pct,Income-150000_plus_pct";

    fn resolver() -> WardResolver {
        let data = format!(
            "{HEADER}\n\"MULTIPOLYGON (((-87.7 41.8, -87.6 41.8, -87.6 41.9, -87.7 41.9, -87.7 41.8)))\",10,55.0,20.0,10.0,15.0,20.0,20.0,30.0,15.0,15.0\n"
        );
        WardResolver::new(&BoundaryStore::from_reader(data.as_bytes()).unwrap())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_select_point_resolves_ward() {
        let resolver = resolver();
        let mut selection = Selection::new();
        let inside = GeoPoint::new(41.85, -87.65).unwrap();

        assert_eq!(selection.select_point(inside, &resolver), Some(10));
        assert_eq!(selection.ward(), Some(10));
        assert_eq!(selection.point(), Some(inside));
    }

    #[test]
    fn test_select_point_replaces_stale_ward() {
        let resolver = resolver();
        let mut selection = Selection::new();
        selection.select_point(GeoPoint::new(41.85, -87.65).unwrap(), &resolver);

        let outside = GeoPoint::new(41.95, -87.65).unwrap();
        assert_eq!(selection.select_point(outside, &resolver), None);
        assert_eq!(selection.ward(), None);
        assert_eq!(selection.point(), Some(outside));
    }

    #[test]
    fn test_request_requires_every_piece() {
        let resolver = resolver();
        let mut selection = Selection::new();
        assert!(matches!(
            selection.request(),
            Err(PredictionError::IncompleteSelection(_))
        ));

        selection.select_when(date(), TimeBucket::LateNight);
        assert_eq!(selection.date(), Some(date()));
        assert_eq!(selection.bucket(), Some(TimeBucket::LateNight));
        assert!(matches!(
            selection.request(),
            Err(PredictionError::IncompleteSelection(_))
        ));
        assert!(!selection.is_complete());

        selection.select_point(GeoPoint::new(41.85, -87.65).unwrap(), &resolver);
        assert!(selection.is_complete());
        assert!(selection.request().is_ok());
    }

    #[test]
    fn test_request_uses_bucket_midpoint() {
        let resolver = resolver();
        let mut selection = Selection::new();
        selection.select_point(GeoPoint::new(41.85, -87.65).unwrap(), &resolver);
        selection.select_when(date(), TimeBucket::EarlyNight);

        let request = selection.request().unwrap();
        assert_eq!(request.ward, 10);
        assert_eq!(request.date_of_occurrence, "2024-03-01 21:00");
        assert_eq!(request.latitude, 41.85);
        assert_eq!(request.longitude, -87.65);
    }

    #[test]
    fn test_clear_resets_everything() {
        let resolver = resolver();
        let mut selection = Selection::new();
        selection.select_point(GeoPoint::new(41.85, -87.65).unwrap(), &resolver);
        selection.select_when(date(), TimeBucket::LateNoon);

        selection.clear();
        assert_eq!(selection, Selection::default());
    }
}
