//! Label-setting shortest path over a transient, integer-keyed copy of the
//! graph. External handles are remapped before every query.

use crate::document::Document;
use crate::drawing::SpatialStore;
use crate::error::{GraphError, PathError, Result};
use crate::geometry::math::distance;
use crate::model::{Handle, Point3, VertexId};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathVertex {
    pub id: u64,
    pub position: Point3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathEdge {
    pub a: u64,
    pub b: u64,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// `[start, .., end]`, or just `[end]` when `end` is unreachable.
    pub vertices: Vec<u64>,
    pub distance: f64,
}

impl Route {
    pub fn is_path(&self) -> bool {
        self.vertices.len() > 1
    }
}

/// Snapshot of a weighted undirected graph keyed by plain integer ids.
#[derive(Clone, Debug, Default)]
pub struct PathFinder {
    ids: Vec<u64>,                    // scan order
    slots: HashMap<u64, usize>,       // id -> index into `ids`
    arcs: Vec<Vec<(usize, f64)>>,     // both directions per edge
}

impl PathFinder {
    pub fn new(vertices: &[PathVertex], edges: &[PathEdge]) -> Self {
        let mut finder = PathFinder::default();
        finder.initialize(vertices, edges);
        finder
    }

    /// Replaces the snapshot. A repeated vertex id keeps its first entry;
    /// edges naming an unknown vertex are dropped.
    pub fn initialize(&mut self, vertices: &[PathVertex], edges: &[PathEdge]) {
        self.ids.clear();
        self.slots.clear();
        self.arcs.clear();
        for v in vertices {
            if self.slots.contains_key(&v.id) {
                continue;
            }
            self.slots.insert(v.id, self.ids.len());
            self.ids.push(v.id);
            self.arcs.push(Vec::new());
        }
        for e in edges {
            let (Some(&a), Some(&b)) = (self.slots.get(&e.a), self.slots.get(&e.b)) else {
                continue;
            };
            self.arcs[a].push((b, e.weight));
            self.arcs[b].push((a, e.weight));
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.ids.len()
    }

    pub fn find_shortest_path(&self, start: u64, end: u64) -> std::result::Result<Vec<u64>, PathError> {
        self.find_route(start, end).map(|r| r.vertices)
    }

    /// O(V²) Dijkstra. The unvisited vertex picked each round is the first
    /// minimum in scan order; the search stops once `end` is picked or the
    /// minimum is infinite.
    pub fn find_route(&self, start: u64, end: u64) -> std::result::Result<Route, PathError> {
        let s = *self.slots.get(&start).ok_or(PathError::VertexNotFound(start))?;
        let t = *self.slots.get(&end).ok_or(PathError::VertexNotFound(end))?;
        let n = self.ids.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<usize>> = vec![None; n];
        let mut visited = vec![false; n];
        dist[s] = 0.0;
        loop {
            let mut best: Option<usize> = None;
            for i in 0..n {
                if !visited[i] && best.map_or(true, |b| dist[i] < dist[b]) {
                    best = Some(i);
                }
            }
            let Some(u) = best else { break };
            if dist[u] == f64::INFINITY {
                break;
            }
            visited[u] = true;
            if u == t {
                break;
            }
            for &(v, w) in &self.arcs[u] {
                let alt = dist[u] + w;
                if !visited[v] && alt < dist[v] {
                    dist[v] = alt;
                    prev[v] = Some(u);
                }
            }
        }
        let mut vertices = vec![self.ids[t]];
        let mut at = t;
        while let Some(p) = prev[at] {
            vertices.push(self.ids[p]);
            at = p;
        }
        vertices.reverse();
        Ok(Route { vertices, distance: dist[t] })
    }
}

/// Result of a path query between two vertex handles.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PathResult {
    Found {
        vertices: Vec<Handle>,
        /// One edge per consecutive vertex pair.
        edges: Vec<Handle>,
        length: f64,
    },
    NoPath,
}

impl PathResult {
    pub fn edges(&self) -> &[Handle] {
        match self {
            PathResult::Found { edges, .. } => edges,
            PathResult::NoPath => &[],
        }
    }
}

impl<S: SpatialStore> Document<S> {
    /// Shortest path between two vertex handles.
    ///
    /// Edges weigh the straight distance between their endpoint vertices;
    /// intermediate points do not count.
    pub fn find_path(&self, start: Handle, end: Handle) -> Result<PathResult> {
        let s = self.live_vertex(start)?;
        let t = self.live_vertex(end)?;
        if s == t {
            return Ok(PathResult::Found { vertices: vec![start], edges: Vec::new(), length: 0.0 });
        }

        // dense ids 1..=n over live vertices in store order
        let mut dense: HashMap<VertexId, u64> = HashMap::new();
        let mut back: Vec<VertexId> = Vec::new();
        let mut vertices = Vec::new();
        for (id, v) in self.model.vertices().filter(|(_, v)| !v.erased) {
            back.push(id);
            let key = back.len() as u64;
            dense.insert(id, key);
            vertices.push(PathVertex { id: key, position: v.position });
        }
        let mut edges = Vec::new();
        for (_, e) in self.model.edges() {
            let (Some(&a), Some(&b)) = (dense.get(&e.a), dense.get(&e.b)) else {
                continue;
            };
            let (Some(pa), Some(pb)) = (self.model.vertex(e.a), self.model.vertex(e.b)) else {
                continue;
            };
            edges.push(PathEdge { a, b, weight: distance(pa.position, pb.position) });
        }

        let finder = PathFinder::new(&vertices, &edges);
        let (ds, dt) = match (dense.get(&s), dense.get(&t)) {
            (Some(&ds), Some(&dt)) => (ds, dt),
            _ => return Err(GraphError::VertexNotFound(start)),
        };
        let route = finder.find_route(ds, dt)?;
        if !route.is_path() {
            return Ok(PathResult::NoPath);
        }

        let ids: Vec<VertexId> = route.vertices.iter().map(|&k| back[(k - 1) as usize]).collect();
        let mut path_edges = Vec::with_capacity(ids.len() - 1);
        for pair in ids.windows(2) {
            match self.model.first_edge_between(pair[0], pair[1]).and_then(|e| self.model.edge(e)) {
                Some(edge) => path_edges.push(edge.handle),
                None => return Ok(PathResult::NoPath),
            }
        }
        let handles = ids
            .iter()
            .filter_map(|&id| self.model.vertex(id).map(|v| v.handle))
            .collect();
        Ok(PathResult::Found { vertices: handles, edges: path_edges, length: route.distance })
    }
}
