use crate::document::Document;
use crate::drawing::SpatialStore;
use crate::geometry::math::{distance_sq, project_onto_segment};
use crate::model::{Handle, Point3};
use crate::GraphModel;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pick {
    Vertex { handle: Handle, dist: f64 },
    /// `segment` indexes the edge path `[start, ..points, end]`.
    Edge { handle: Handle, segment: usize, at: Point3, dist: f64 },
}

impl Pick {
    pub fn handle(&self) -> Handle {
        match *self {
            Pick::Vertex { handle, .. } | Pick::Edge { handle, .. } => handle,
        }
    }
}

pub fn pick_impl(g: &GraphModel, p: Point3, tol: f64) -> Option<Pick> {
    let tol2 = tol * tol;
    // Vertices first
    let mut best_vertex: Option<(Handle, f64)> = None;
    for (_, v) in g.vertices().filter(|(_, v)| !v.erased) {
        let d2 = distance_sq(v.position, p);
        if d2 <= tol2 && best_vertex.map_or(true, |(_, bd)| d2 < bd) {
            best_vertex = Some((v.handle, d2));
        }
    }
    if let Some((handle, d2)) = best_vertex {
        return Some(Pick::Vertex { handle, dist: d2.sqrt() });
    }
    // Edges
    let mut best_edge: Option<(Handle, usize, Point3, f64)> = None;
    for (id, e) in g.edges() {
        let Some(path) = g.edge_polyline(id) else { continue };
        for (i, seg) in path.windows(2).enumerate() {
            let (proj, _, d2) = project_onto_segment(p, seg[0], seg[1]);
            if d2 <= tol2 && best_edge.map_or(true, |(_, _, _, bd)| d2 < bd) {
                best_edge = Some((e.handle, i, proj, d2));
            }
        }
    }
    best_edge.map(|(handle, segment, at, d2)| Pick::Edge { handle, segment, at, dist: d2.sqrt() })
}

impl<S: SpatialStore> Document<S> {
    /// Nearest vertex within `tol` of `p`, else the nearest edge.
    pub fn pick(&self, p: Point3, tol: f64) -> Option<Pick> {
        pick_impl(&self.model, p, tol)
    }
}
