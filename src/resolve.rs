//! Point-to-ward resolution.
//!
//! Boundaries go into an R-tree keyed by bounding box; a lookup narrows to
//! the envelopes containing the point, then runs the exact point-in-polygon
//! test on those few candidates.

use geo::{BoundingRect, Contains, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};

use crate::boundaries::BoundaryStore;
use crate::geometry::GeoPoint;

struct WardEntry {
    ward: i64,
    order: usize,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for WardEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn envelope_of(polygon: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    match polygon.bounding_rect() {
        Some(rect) => AABB::from_corners(
            [rect.min().x, rect.min().y],
            [rect.max().x, rect.max().y],
        ),
        // An empty geometry gets a degenerate envelope; it can never match.
        None => AABB::from_point([0.0, 0.0]),
    }
}

/// Spatial index over a [`BoundaryStore`] answering "which ward is this
/// point in".
pub struct WardResolver {
    tree: RTree<WardEntry>,
}

impl WardResolver {
    /// Builds the index. The store's file order is retained as the
    /// tie-break for overlapping boundaries.
    pub fn new(store: &BoundaryStore) -> Self {
        let entries = store
            .iter()
            .enumerate()
            .map(|(order, boundary)| WardEntry {
                ward: boundary.ward,
                order,
                envelope: envelope_of(&boundary.polygon),
                polygon: boundary.polygon.clone(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Resolves a point to the ward whose boundary contains it, or `None`
    /// when no boundary does.
    ///
    /// Containment is interior-only, so a point exactly on a boundary line
    /// resolves to `None`. If boundaries overlap, the ward earliest in the
    /// dataset wins.
    pub fn resolve(&self, point: &GeoPoint) -> Option<i64> {
        let location = point.to_point();
        let probe = AABB::from_point([location.x(), location.y()]);
        self.tree
            .locate_in_envelope_intersecting(&probe)
            .filter(|entry| entry.polygon.contains(&location))
            .min_by_key(|entry| entry.order)
            .map(|entry| entry.ward)
    }
}
