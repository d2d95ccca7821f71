// Ingestion limits applied when rebuilding a graph from a drawing and when
// accepting new geometry.

use crate::model::Point3;

// Graph size caps
pub const MAX_VERTICES: usize = 100_000;
pub const MAX_EDGES: usize = 200_000;

// Drawing scan cap for restore
pub const MAX_ENTITIES: usize = 1_000_000;

// Polylines
pub const MAX_POINTS_PER_EDGE: usize = 8_000;

// Numeric bounds
pub const COORD_MIN: f64 = -1.0e12;
pub const COORD_MAX: f64 = 1.0e12;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn point_in_bounds(p: &Point3) -> bool {
    in_coord_bounds(p.x) && in_coord_bounds(p.y) && in_coord_bounds(p.z)
}
