use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// Point on the drawing plane (z = 0).
    pub const fn xy(x: f64, y: f64) -> Self {
        Point3 { x, y, z: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Identifier the spatial store assigns to a visual representation.
///
/// Handles are not stable: recreating a representation (shape change,
/// geometry rewrite) yields a fresh handle. Use the vertex `uid` to follow
/// a vertex across recreations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Handle {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Handle)
    }
}

/// Stable index of a vertex record inside a `GraphModel`.
pub type VertexId = u32;
/// Stable index of an edge record inside a `GraphModel`.
pub type EdgeId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Triangle,
}

impl Shape {
    pub fn toggled(self) -> Shape {
        match self {
            Shape::Circle => Shape::Triangle,
            Shape::Triangle => Shape::Circle,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub handle: Handle,
    pub uid: String,
    pub position: Point3,
    pub label: String,
    pub shape: Shape,
    /// Incident edges; no duplicates, order irrelevant.
    pub attached: Vec<EdgeId>,
    /// Tombstone: the representation was erased but edge cleanup is pending.
    pub erased: bool,
}

impl Vertex {
    pub fn new(handle: Handle, position: Point3, shape: Shape) -> Self {
        Vertex {
            handle,
            uid: String::new(),
            position,
            label: String::new(),
            shape,
            attached: Vec::new(),
            erased: false,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn is_triangle(&self) -> bool {
        self.shape == Shape::Triangle
    }

    pub fn attach(&mut self, edge: EdgeId) -> bool {
        if self.attached.contains(&edge) {
            return false;
        }
        self.attached.push(edge);
        true
    }

    pub fn detach(&mut self, edge: EdgeId) -> bool {
        let before = self.attached.len();
        self.attached.retain(|e| *e != edge);
        self.attached.len() != before
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub handle: Handle,
    pub a: VertexId,
    pub b: VertexId,
    /// Interior points of the drawn path, excluding both endpoints.
    pub points: Vec<Point3>,
}

impl Edge {
    pub fn new(handle: Handle, a: VertexId, b: VertexId) -> Self {
        Edge {
            handle,
            a,
            b,
            points: Vec::new(),
        }
    }

    pub fn with_points(mut self, points: Vec<Point3>) -> Self {
        self.points = points;
        self
    }

    /// True when the edge joins `u` and `v` in either direction.
    pub fn joins(&self, u: VertexId, v: VertexId) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }
}
