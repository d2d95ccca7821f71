//! One graph model bound to one spatial store.

use crate::config::Settings;
use crate::drawing::SpatialStore;
use crate::error::{GraphError, Result};
use crate::geometry::limits;
use crate::metadata;
use crate::model::{Edge, EdgeId, Handle, Point3, Shape, Vertex, VertexId};
use crate::GraphModel;
use log::{debug, info, warn};

pub struct Document<S: SpatialStore> {
    pub(crate) model: GraphModel,
    pub(crate) store: S,
    pub(crate) settings: Settings,
    // "currently selected" working set, in selection order
    pub(crate) selection: Vec<VertexId>,
}

pub(crate) fn new_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl<S: SpatialStore> Document<S> {
    pub fn new(store: S) -> Self {
        Self::with_settings(store, Settings::default())
    }

    pub fn with_settings(store: S, settings: Settings) -> Self {
        Document {
            model: GraphModel::new(),
            store,
            settings: settings.sanitized(),
            selection: Vec::new(),
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct access to the spatial store, as the host editor has it.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // Selection

    pub fn select(&mut self, handle: Handle) -> bool {
        match self.model.vertex_id(handle) {
            Some(id) => {
                self.add_to_selection(id);
                true
            }
            None => false,
        }
    }

    pub fn selection(&self) -> Vec<Handle> {
        self.selection
            .iter()
            .filter_map(|&id| self.model.vertex(id).map(|v| v.handle))
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub(crate) fn add_to_selection(&mut self, id: VertexId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub(crate) fn drop_from_selection(&mut self, id: VertexId) {
        self.selection.retain(|&s| s != id);
    }

    /// Resolves a handle to a vertex that is registered and not erased.
    pub(crate) fn live_vertex(&self, handle: Handle) -> Result<VertexId> {
        match self.model.vertex_id(handle) {
            Some(id) if self.model.vertex(id).map_or(false, |v| !v.erased) => Ok(id),
            _ => Err(GraphError::VertexNotFound(handle)),
        }
    }

    // Creation

    /// Creates a vertex representation and registers it with a fresh uid.
    pub fn create_vertex(&mut self, shape: Shape, at: Point3, label: &str) -> Result<Handle> {
        if !limits::point_in_bounds(&at) {
            return Err(GraphError::OutOfBounds);
        }
        if self.model.vertex_count() >= limits::MAX_VERTICES {
            return Err(GraphError::Limit("vertices"));
        }
        let uid = new_uid();
        let handle = self.store.create_vertex_shape(
            shape,
            at,
            self.settings.vertex_radius,
            metadata::vertex_tags(label, &uid),
        )?;
        let vertex = Vertex::new(handle, at, shape).with_uid(uid).with_label(label);
        let id = self.model.upsert_vertex(handle, vertex);
        self.add_to_selection(id);
        debug!("created vertex {} at ({}, {})", handle, at.x, at.y);
        Ok(handle)
    }

    /// Creates an edge between two live vertices through `intermediates`.
    pub fn create_edge(&mut self, a: Handle, b: Handle, intermediates: Vec<Point3>) -> Result<Handle> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        let ia = self.live_vertex(a)?;
        let ib = self.live_vertex(b)?;
        if intermediates.len() > limits::MAX_POINTS_PER_EDGE {
            return Err(GraphError::Limit("points per edge"));
        }
        if !intermediates.iter().all(limits::point_in_bounds) {
            return Err(GraphError::OutOfBounds);
        }
        if self.model.edge_count() >= limits::MAX_EDGES {
            return Err(GraphError::Limit("edges"));
        }
        let handle = self.draw_edge(ia, ib, &intermediates)?;
        self.register_edge(Edge::new(handle, ia, ib).with_points(intermediates));
        Ok(handle)
    }

    /// Creates the polyline for an edge between two registered vertices and
    /// tags it with the endpoint handles. The model is not touched.
    pub(crate) fn draw_edge(&mut self, a: VertexId, b: VertexId, intermediates: &[Point3]) -> Result<Handle> {
        let (start, start_at) = self.vertex_anchor(a)?;
        let (end, end_at) = self.vertex_anchor(b)?;
        self.draw_polyline((start, start_at), (end, end_at), intermediates)
    }

    pub(crate) fn draw_polyline(
        &mut self,
        start: (Handle, Point3),
        end: (Handle, Point3),
        intermediates: &[Point3],
    ) -> Result<Handle> {
        let mut pts = Vec::with_capacity(intermediates.len() + 2);
        pts.push(start.1);
        pts.extend_from_slice(intermediates);
        pts.push(end.1);
        let handle = self
            .store
            .create_polyline(&pts, metadata::edge_tags(start.0, end.0))?;
        Ok(handle)
    }

    pub(crate) fn vertex_anchor(&self, id: VertexId) -> Result<(Handle, Point3)> {
        self.model
            .vertex(id)
            .map(|v| (v.handle, v.position))
            .ok_or(GraphError::VertexNotFound(Handle(0)))
    }

    pub(crate) fn register_edge(&mut self, edge: Edge) -> Option<EdgeId> {
        let handle = edge.handle;
        let id = self.model.upsert_edge(edge);
        match id {
            Some(_) => debug!("registered edge {}", handle),
            None => warn!("edge {} references a missing vertex; not registered", handle),
        }
        id
    }

    /// Erases created representations after a failed multi-step operation.
    pub(crate) fn discard(&mut self, handles: &[Handle]) {
        for &h in handles {
            if let Err(err) = self.store.erase(h) {
                debug!("rollback could not erase {}: {}", h, err);
            }
        }
    }

    // Deletion

    /// Erases a vertex together with its incident edges, or a single edge.
    pub fn delete_element(&mut self, handle: Handle) -> Result<()> {
        if let Some(id) = self.model.vertex_id(handle) {
            let attached = self
                .model
                .vertex(id)
                .map(|v| v.attached.clone())
                .unwrap_or_default();
            for e in attached {
                self.drop_edge(e);
            }
            if let Err(err) = self.store.erase(handle) {
                debug!("vertex {} already gone from the drawing: {}", handle, err);
            }
            self.model.remove_vertex(handle);
            self.drop_from_selection(id);
            return Ok(());
        }
        if let Some(id) = self.model.find_edge_by_handle(handle) {
            self.drop_edge(id);
            return Ok(());
        }
        Err(GraphError::HandleNotFound(handle))
    }

    /// Erases an edge representation and unregisters the edge.
    pub(crate) fn drop_edge(&mut self, id: EdgeId) {
        if let Some(edge) = self.model.remove_edge(id) {
            if let Err(err) = self.store.erase(edge.handle) {
                debug!("edge {} already gone from the drawing: {}", edge.handle, err);
            }
        }
    }

    /// Removes erased vertices together with every edge incident to them.
    pub fn sweep_erased(&mut self) -> usize {
        let erased: Vec<(VertexId, Handle)> = self
            .model
            .vertices()
            .filter(|(_, v)| v.erased)
            .map(|(id, v)| (id, v.handle))
            .collect();
        for &(id, handle) in &erased {
            let attached = self
                .model
                .vertex(id)
                .map(|v| v.attached.clone())
                .unwrap_or_default();
            for e in attached {
                self.drop_edge(e);
            }
            self.model.remove_vertex(handle);
            self.drop_from_selection(id);
        }
        if !erased.is_empty() {
            info!("swept {} erased vertices", erased.len());
        }
        erased.len()
    }

    // Maintenance

    /// Recreates a vertex in the other shape, keeping uid and label.
    pub fn change_shape(&mut self, handle: Handle) -> Result<Handle> {
        let id = self.live_vertex(handle)?;
        let (shape, position, label, uid) = match self.model.vertex(id) {
            Some(v) => (v.shape.toggled(), v.position, v.label.clone(), v.uid.clone()),
            None => return Err(GraphError::VertexNotFound(handle)),
        };
        let uid = if uid.trim().is_empty() { new_uid() } else { uid };
        let new_handle = self.store.create_vertex_shape(
            shape,
            position,
            self.settings.vertex_radius,
            metadata::vertex_tags(&label, &uid),
        )?;
        if let Err(err) = self.store.erase(handle) {
            self.discard(&[new_handle]);
            return Err(err.into());
        }
        if let Some(v) = self.model.vertex_mut(id) {
            v.uid = uid;
        }
        self.rekey(id, new_handle);
        Ok(new_handle)
    }

    /// Writes a fresh uid to every vertex that has none.
    pub fn ensure_uids(&mut self) -> usize {
        let missing: Vec<(VertexId, Handle, String)> = self
            .model
            .vertices()
            .filter(|(_, v)| v.uid.trim().is_empty())
            .map(|(id, v)| (id, v.handle, v.label.clone()))
            .collect();
        let mut written = 0;
        for (id, handle, label) in missing {
            let uid = new_uid();
            match self.store.set_metadata(handle, metadata::vertex_tags(&label, &uid)) {
                Ok(()) => {
                    if let Some(v) = self.model.vertex_mut(id) {
                        v.uid = uid;
                    }
                    written += 1;
                }
                Err(err) => warn!("could not write uid for vertex {}: {}", handle, err),
            }
        }
        info!("ensured uids for {} vertices", written);
        written
    }

    /// Redraws every edge from the cached vertex positions.
    pub fn refresh_edges(&mut self) -> usize {
        let ids: Vec<EdgeId> = self.model.edges().map(|(id, _)| id).collect();
        let refreshed = ids.into_iter().filter(|&id| self.resync_edge(id)).count();
        info!("refreshed {} edges", refreshed);
        refreshed
    }

    /// Diagnostic dump of the in-memory graph.
    pub fn dump_state(&self) -> serde_json::Value {
        crate::json::dump_state_impl(&self.model, &self.selection())
    }
}
