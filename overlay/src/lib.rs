pub mod config;
pub mod document;
pub mod drawing;
pub mod error;
pub mod memory;
pub mod metadata;
pub mod model;
pub mod session;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod picking;
    pub mod reconcile;
    pub mod restore;
    pub mod shortest_path;
    pub mod split;
}
mod json;

pub use config::Settings;
pub use document::Document;
pub use drawing::{EntityKind, Notification, SpatialStore};
pub use error::{GraphError, PathError, Result, StoreError};
pub use memory::MemoryDrawing;
pub use model::{Edge, EdgeId, Handle, Point3, Shape, Vertex, VertexId};
pub use session::Session;

use geometry::math::{distance, polyline_length};
use std::collections::HashMap;

/// Authoritative in-memory graph: vertices keyed by their current external
/// handle, edges in creation order.
///
/// Records live in slots addressed by stable ids; edges reference vertices by
/// id, so a handle change touches only the handle index. Callers keep the
/// cross-record invariants (no edge to a removed vertex, unique uids).
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
    pub(crate) vertices: Vec<Option<Vertex>>, // id is index
    pub(crate) edges: Vec<Option<Edge>>,      // id is index
    pub(crate) vertex_index: HashMap<Handle, VertexId>,
    pub(crate) edge_index: HashMap<Handle, EdgeId>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.vertex_index.clear();
        self.edge_index.clear();
    }

    // Vertices

    /// Inserts `vertex` under `handle`, silently replacing any vertex already
    /// registered there. A replaced record keeps its incident-edge set so the
    /// edges that reference it stay attached.
    pub fn upsert_vertex(&mut self, handle: Handle, mut vertex: Vertex) -> VertexId {
        vertex.handle = handle;
        if let Some(&id) = self.vertex_index.get(&handle) {
            if let Some(slot) = self.vertices.get_mut(id as usize) {
                if let Some(old) = slot.take() {
                    for e in old.attached {
                        vertex.attach(e);
                    }
                }
                *slot = Some(vertex);
                return id;
            }
        }
        let id = self.vertices.len() as VertexId;
        self.vertices.push(Some(vertex));
        self.vertex_index.insert(handle, id);
        id
    }

    /// Removes the vertex registered under `handle`. Incident edges are left
    /// in place and must be removed by the caller.
    pub fn remove_vertex(&mut self, handle: Handle) -> Option<Vertex> {
        let id = self.vertex_index.remove(&handle)?;
        let mut vertex = self.vertices.get_mut(id as usize)?.take()?;
        vertex.attached.clear();
        Some(vertex)
    }

    pub fn vertex_id(&self, handle: Handle) -> Option<VertexId> {
        self.vertex_index.get(&handle).copied()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id as usize).and_then(|v| v.as_ref())
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id as usize).and_then(|v| v.as_mut())
    }

    pub fn vertex_by_handle(&self, handle: Handle) -> Option<&Vertex> {
        self.vertex(self.vertex_id(handle)?)
    }

    /// First vertex (in creation order) carrying `uid`.
    pub fn find_vertex_by_uid(&self, uid: &str) -> Option<VertexId> {
        if uid.is_empty() {
            return None;
        }
        self.vertices().find(|(_, v)| v.uid == uid).map(|(id, _)| id)
    }

    /// Moves a vertex to `new_handle`. Refuses a handle owned by another vertex.
    pub fn rekey_vertex(&mut self, id: VertexId, new_handle: Handle) -> bool {
        match self.vertex_index.get(&new_handle) {
            Some(&owner) if owner != id => return false,
            _ => {}
        }
        let vertex = match self.vertices.get_mut(id as usize).and_then(|v| v.as_mut()) {
            Some(v) => v,
            None => return false,
        };
        let old = vertex.handle;
        vertex.handle = new_handle;
        self.vertex_index.remove(&old);
        self.vertex_index.insert(new_handle, id);
        true
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i as VertexId, v)))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_index.len()
    }

    /// Handles of the edges incident to the vertex at `handle`.
    pub fn attached_edge_handles(&self, handle: Handle) -> Vec<Handle> {
        self.vertex_by_handle(handle)
            .map(|v| {
                v.attached
                    .iter()
                    .filter_map(|&e| self.edge(e).map(|e| e.handle))
                    .collect()
            })
            .unwrap_or_default()
    }

    // Edges

    /// Registers `edge` and attaches it to both endpoints. An edge already
    /// registered under the same handle is replaced. Returns `None` when an
    /// endpoint is not a live vertex.
    pub fn upsert_edge(&mut self, edge: Edge) -> Option<EdgeId> {
        self.vertex(edge.a)?;
        self.vertex(edge.b)?;
        let id = match self.edge_index.get(&edge.handle).copied() {
            Some(id) => {
                if let Some(old) = self.edges.get_mut(id as usize).and_then(|e| e.take()) {
                    self.detach(old.a, id);
                    self.detach(old.b, id);
                }
                self.edges[id as usize] = Some(edge.clone());
                id
            }
            None => {
                let id = self.edges.len() as EdgeId;
                self.edge_index.insert(edge.handle, id);
                self.edges.push(Some(edge.clone()));
                id
            }
        };
        if let Some(v) = self.vertex_mut(edge.a) {
            v.attach(id);
        }
        if let Some(v) = self.vertex_mut(edge.b) {
            v.attach(id);
        }
        Some(id)
    }

    /// Removes an edge and detaches it from both endpoints.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id as usize)?.take()?;
        self.edge_index.remove(&edge.handle);
        self.detach(edge.a, id);
        self.detach(edge.b, id);
        Some(edge)
    }

    pub fn remove_edge_by_handle(&mut self, handle: Handle) -> Option<Edge> {
        let id = self.find_edge_by_handle(handle)?;
        self.remove_edge(id)
    }

    fn detach(&mut self, v: VertexId, e: EdgeId) {
        if let Some(vertex) = self.vertex_mut(v) {
            vertex.detach(e);
        }
    }

    pub fn find_edge_by_handle(&self, handle: Handle) -> Option<EdgeId> {
        self.edge_index.get(&handle).copied()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id as usize).and_then(|e| e.as_ref())
    }

    pub fn edge_by_handle(&self, handle: Handle) -> Option<&Edge> {
        self.edge(self.find_edge_by_handle(handle)?)
    }

    pub(crate) fn rekey_edge(&mut self, id: EdgeId, new_handle: Handle) -> bool {
        if self.edge_index.get(&new_handle).map_or(false, |&owner| owner != id) {
            return false;
        }
        let edge = match self.edges.get_mut(id as usize).and_then(|e| e.as_mut()) {
            Some(e) => e,
            None => return false,
        };
        let old = edge.handle;
        edge.handle = new_handle;
        self.edge_index.remove(&old);
        self.edge_index.insert(new_handle, id);
        true
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i as EdgeId, e)))
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Current handles of the two endpoint vertices.
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<(Handle, Handle)> {
        let e = self.edge(id)?;
        Some((self.vertex(e.a)?.handle, self.vertex(e.b)?.handle))
    }

    /// Full drawn path: start position, interior points, end position.
    pub fn edge_polyline(&self, id: EdgeId) -> Option<Vec<Point3>> {
        let e = self.edge(id)?;
        let a = self.vertex(e.a)?.position;
        let b = self.vertex(e.b)?.position;
        let mut pts = Vec::with_capacity(e.points.len() + 2);
        pts.push(a);
        pts.extend_from_slice(&e.points);
        pts.push(b);
        Some(pts)
    }

    /// Length of the drawn path through the interior points.
    pub fn edge_length(&self, id: EdgeId) -> Option<f64> {
        self.edge_polyline(id).map(|pts| polyline_length(&pts))
    }

    /// Straight distance between the endpoint positions; the path-finding weight.
    pub fn edge_chord(&self, id: EdgeId) -> Option<f64> {
        let e = self.edge(id)?;
        Some(distance(self.vertex(e.a)?.position, self.vertex(e.b)?.position))
    }

    /// First edge, in creation order, joining `u` and `v`.
    pub fn first_edge_between(&self, u: VertexId, v: VertexId) -> Option<EdgeId> {
        self.edges().find(|(_, e)| e.joins(u, v)).map(|(id, _)| id)
    }
}
