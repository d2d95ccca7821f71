use super::tolerance::{clamp01, EPS_SEG_LEN2};
use crate::model::Point3;

#[inline]
pub fn distance_sq(a: Point3, b: Point3) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    dx * dx + dy * dy + dz * dz
}

#[inline]
pub fn distance(a: Point3, b: Point3) -> f64 {
    distance_sq(a, b).sqrt()
}

/// Clamped projection of `p` onto segment `a`-`b`.
///
/// Returns the projected point, the segment parameter `t` in `[0, 1]` and the
/// squared distance from `p` to the projection. A degenerate segment projects
/// everything onto `a` (`t = 0`).
pub fn project_onto_segment(p: Point3, a: Point3, b: Point3) -> (Point3, f64, f64) {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let vz = b.z - a.z;
    let vv = vx * vx + vy * vy + vz * vz;
    let t = if vv > EPS_SEG_LEN2 {
        clamp01(((p.x - a.x) * vx + (p.y - a.y) * vy + (p.z - a.z) * vz) / vv)
    } else {
        0.0
    };
    let proj = Point3::new(a.x + t * vx, a.y + t * vy, a.z + t * vz);
    (proj, t, distance_sq(p, proj))
}

/// Sum of consecutive segment lengths.
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// True when any axis differs by more than `eps`.
#[inline]
pub fn moved_beyond(old: Point3, new: Point3, eps: f64) -> bool {
    (old.x - new.x).abs() > eps || (old.y - new.y).abs() > eps || (old.z - new.z).abs() > eps
}
