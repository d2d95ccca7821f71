//! Rebuilding the graph model from the entities already in a drawing.

use crate::document::{new_uid, Document};
use crate::drawing::{EntityKind, SpatialStore};
use crate::error::{GraphError, Result};
use crate::geometry::limits;
use crate::metadata::{self, parse_edge, parse_vertex};
use crate::model::{Edge, Handle, Vertex};
use crate::GraphModel;
use log::{debug, info, warn};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub vertices: usize,
    pub edges: usize,
    /// Vertices that received a fresh uid (missing or duplicated).
    pub uids_assigned: usize,
    /// Tagged polylines whose endpoints did not resolve.
    pub dangling_edges: usize,
}

impl<S: SpatialStore> Document<S> {
    /// Replaces the model with the graph found in the spatial store.
    ///
    /// Vertices come first (circles and triangles with vertex tags), then
    /// edges (polylines with edge tags whose endpoints were restored). The
    /// current model is kept if the drawing exceeds the ingestion caps.
    pub fn restore(&mut self) -> Result<RestoreSummary> {
        let handles = self.store.entities();
        if handles.len() > limits::MAX_ENTITIES {
            return Err(GraphError::Limit("entities"));
        }
        let mut model = GraphModel::new();
        let mut summary = RestoreSummary::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut rewrites: Vec<(Handle, String, String)> = Vec::new();

        for &h in &handles {
            let Some(shape) = self.store.kind(h).ok().and_then(EntityKind::vertex_shape) else {
                continue;
            };
            let Some(meta) = self.store.metadata(h).ok().and_then(|t| parse_vertex(&t)) else {
                continue;
            };
            let position = match self.store.position(h) {
                Ok(p) => p,
                Err(err) => {
                    warn!("skipping vertex {}: {}", h, err);
                    continue;
                }
            };
            if model.vertex_count() >= limits::MAX_VERTICES {
                return Err(GraphError::Limit("vertices"));
            }
            let uid = match meta.uid {
                Some(uid) if !seen.contains(&uid) => uid,
                _ => {
                    let uid = new_uid();
                    rewrites.push((h, meta.label.clone(), uid.clone()));
                    uid
                }
            };
            seen.insert(uid.clone());
            let vertex = Vertex::new(h, position, shape)
                .with_uid(uid)
                .with_label(meta.label);
            model.upsert_vertex(h, vertex);
            summary.vertices += 1;
        }

        for &h in &handles {
            if !matches!(self.store.kind(h), Ok(EntityKind::Polyline)) {
                continue;
            }
            let Some(meta) = self.store.metadata(h).ok().and_then(|t| parse_edge(&t)) else {
                continue;
            };
            let (Some(a), Some(b)) = (model.vertex_id(meta.start), model.vertex_id(meta.end)) else {
                debug!("edge {} references {} and {}; not both restored", h, meta.start, meta.end);
                summary.dangling_edges += 1;
                continue;
            };
            let points = match self.store.points(h) {
                Ok(pts) if pts.len() >= 2 => pts[1..pts.len() - 1].to_vec(),
                Ok(_) => Vec::new(),
                Err(err) => {
                    warn!("skipping edge {}: {}", h, err);
                    continue;
                }
            };
            if model.edge_count() >= limits::MAX_EDGES {
                return Err(GraphError::Limit("edges"));
            }
            if model.upsert_edge(Edge::new(h, a, b).with_points(points)).is_some() {
                summary.edges += 1;
            }
        }

        for (h, label, uid) in rewrites {
            match self.store.set_metadata(h, metadata::vertex_tags(&label, &uid)) {
                Ok(()) => summary.uids_assigned += 1,
                Err(err) => warn!("could not persist uid for vertex {}: {}", h, err),
            }
        }
        self.model = model;
        self.selection = self.model.vertices().map(|(id, _)| id).collect();
        info!(
            "restored {} vertices and {} edges ({} fresh uids, {} dangling edges)",
            summary.vertices, summary.edges, summary.uids_assigned, summary.dangling_edges
        );
        Ok(summary)
    }
}
