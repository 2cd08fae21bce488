//! WKT geometry parsing and coordinate handling.

use geo::MultiPolygon;
use wkt::TryFromWkt;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Errors raised while parsing a ward geometry column.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// The text is not valid Well-Known Text.
    #[error("invalid WKT geometry: {0}")]
    Wkt(String),

    /// The text parsed, but into a non-areal geometry.
    #[error("unsupported geometry type {0}; expected POLYGON or MULTIPOLYGON")]
    UnsupportedType(&'static str),
}

/// Parses a WKT string into a [`MultiPolygon`].
///
/// Handles both `POLYGON` (wrapped into a single-member multipolygon) and
/// `MULTIPOLYGON`. Every other geometry type is rejected: ward boundaries
/// are areas, and a row carrying anything else is a broken dataset.
///
/// # Errors
///
/// Returns [`GeometryError`] if the text is not WKT or not an areal type.
pub fn multipolygon_from_wkt(input: &str) -> Result<MultiPolygon<f64>, GeometryError> {
    let geometry = geo::Geometry::<f64>::try_from_wkt_str(input)
        .map_err(|e| GeometryError::Wkt(e.to_string()))?;

    match geometry {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        other => Err(GeometryError::UnsupportedType(geometry_kind(&other))),
    }
}

fn geometry_kind(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "POINT",
        geo::Geometry::Line(_) => "LINE",
        geo::Geometry::LineString(_) => "LINESTRING",
        geo::Geometry::Polygon(_) => "POLYGON",
        geo::Geometry::MultiPoint(_) => "MULTIPOINT",
        geo::Geometry::MultiLineString(_) => "MULTILINESTRING",
        geo::Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        geo::Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        geo::Geometry::Rect(_) => "RECT",
        geo::Geometry::Triangle(_) => "TRIANGLE",
    }
}

/// A latitude/longitude pair in WGS84 degrees, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Coordinates outside the WGS84 domain (or not finite numbers).
#[derive(Debug, thiserror::Error)]
#[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
pub struct InvalidCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Builds a point, rejecting coordinates outside [-90, 90] latitude or
    /// [-180, 180] longitude. NaN fails both range checks, so a constructed
    /// point is always finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        let lat_ok = (-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude);
        let lon_ok = (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude);

        if lat_ok && lon_ok {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    /// The point in (x = longitude, y = latitude) axis order, the convention
    /// the boundary geometry is stored in.
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "POLYGON ((-87.7 41.8, -87.6 41.8, -87.6 41.9, -87.7 41.9, -87.7 41.8))";

    #[test]
    fn test_parse_polygon() {
        let mp = multipolygon_from_wkt(SQUARE).unwrap();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].exterior().0.len(), 5);
    }

    #[test]
    fn test_parse_multipolygon() {
        let wkt = "MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)), ((2 2, 3 2, 3 3, 2 2)))";
        let mp = multipolygon_from_wkt(wkt).unwrap();
        assert_eq!(mp.0.len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_areal_geometry() {
        let err = multipolygon_from_wkt("POINT (-87.65 41.85)").unwrap_err();
        assert!(matches!(err, GeometryError::UnsupportedType("POINT")));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = multipolygon_from_wkt("not a geometry").unwrap_err();
        assert!(matches!(err, GeometryError::Wkt(_)));
    }

    #[test]
    fn test_geo_point_accepts_chicago() {
        let point = GeoPoint::new(41.8781, -87.6298).unwrap();
        assert_eq!(point.latitude, 41.8781);
        assert_eq!(point.longitude, -87.6298);
    }

    #[test]
    fn test_geo_point_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(-90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 180.5).is_err());
        assert!(GeoPoint::new(0.0, -200.0).is_err());
    }

    #[test]
    fn test_geo_point_rejects_nan() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_to_point_axis_order() {
        let point = GeoPoint::new(41.85, -87.65).unwrap();
        let xy = point.to_point();
        assert_eq!(xy.x(), -87.65);
        assert_eq!(xy.y(), 41.85);
    }
}
