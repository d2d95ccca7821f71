use crate::geometry::tolerance::EPS_MOVE;
use crate::model::Shape;
use serde::{Deserialize, Serialize};

/// Tunables for one document. Missing JSON keys fall back to defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-axis delta below which a move notification is ignored.
    pub move_epsilon: f64,
    /// Size passed to the spatial store for new vertex representations.
    pub vertex_radius: f64,
    /// Shape of vertices materialized by edge splits.
    pub split_shape: Shape,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            move_epsilon: EPS_MOVE,
            vertex_radius: 200.0,
            split_shape: Shape::Circle,
        }
    }
}

impl Settings {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(s).map(Settings::sanitized)
    }

    /// Replaces unusable values with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        if !self.move_epsilon.is_finite() || self.move_epsilon < 0.0 {
            self.move_epsilon = defaults.move_epsilon;
        }
        if !self.vertex_radius.is_finite() || self.vertex_radius <= 0.0 {
            self.vertex_radius = defaults.vertex_radius;
        }
        self
    }
}
