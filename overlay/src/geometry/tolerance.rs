// Centralized tolerances for graph geometry

pub const EPS_MOVE: f64 = 1e-6; // per-axis move threshold (drawing units)
pub const EPS_SEG_LEN2: f64 = 1e-18; // squared length below which a segment is a point
pub const EPS_TEST: f64 = 1e-9; // comparison slack for tests/invariants

#[inline] pub fn clamp01(x: f64) -> f64 { x.max(0.0).min(1.0) }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }
