//! Splitting an edge at the point of its path nearest to a target.

use crate::document::{new_uid, Document};
use crate::drawing::SpatialStore;
use crate::error::{GraphError, Result};
use crate::geometry::limits;
use crate::geometry::math::project_onto_segment;
use crate::metadata;
use crate::model::{Edge, Handle, Point3, Vertex};
use log::{debug, info};

/// Nearest point of a polyline to some target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitPoint {
    /// Index `i` of the winning segment `points[i]..points[i + 1]`.
    pub segment: usize,
    pub point: Point3,
    pub distance: f64,
}

/// Scans segments left to right and keeps the first minimal distance.
/// Returns `None` for fewer than two points.
pub fn locate_split(points: &[Point3], target: Point3) -> Option<SplitPoint> {
    let mut best: Option<(usize, Point3, f64)> = None;
    for (i, seg) in points.windows(2).enumerate() {
        let (proj, _, d2) = project_onto_segment(target, seg[0], seg[1]);
        if best.map_or(true, |(_, _, bd)| d2 < bd) {
            best = Some((i, proj, d2));
        }
    }
    best.map(|(segment, point, d2)| SplitPoint { segment, point, distance: d2.sqrt() })
}

/// Interior points left and right of `segment`. Segment `i` of
/// `[start, p0, .., pn, end]` runs between interior points `i - 1` and `i`.
pub fn partition(intermediates: &[Point3], segment: usize) -> (Vec<Point3>, Vec<Point3>) {
    let at = segment.min(intermediates.len());
    (intermediates[..at].to_vec(), intermediates[at..].to_vec())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitOutcome {
    pub vertex: Handle,
    pub left: Handle,
    pub right: Handle,
    pub connection: Option<Handle>,
}

impl<S: SpatialStore> Document<S> {
    /// Replaces `edge` with two edges meeting at a new vertex placed on the
    /// edge path nearest to `target`, optionally wiring `connect` to it.
    ///
    /// All representations are created before the model changes; if any
    /// creation fails the created ones are erased and nothing is applied.
    pub fn split_edge(&mut self, edge: Handle, target: Point3, connect: Option<Handle>) -> Result<SplitOutcome> {
        let id = self
            .model
            .find_edge_by_handle(edge)
            .ok_or(GraphError::EdgeNotFound(edge))?;
        let (a, b, points) = match self.model.edge(id) {
            Some(e) => (e.a, e.b, e.points.clone()),
            None => return Err(GraphError::EdgeNotFound(edge)),
        };
        let path = self.model.edge_polyline(id).unwrap_or_default();
        let at = locate_split(&path, target).ok_or(GraphError::NoSegmentFound(edge))?;
        if !limits::point_in_bounds(&at.point) {
            return Err(GraphError::OutOfBounds);
        }
        let connect = match connect {
            Some(h) => Some(self.live_vertex(h)?),
            None => None,
        };
        if self.model.vertex_count() >= limits::MAX_VERTICES {
            return Err(GraphError::Limit("vertices"));
        }
        if self.model.edge_count() + 2 > limits::MAX_EDGES {
            return Err(GraphError::Limit("edges"));
        }
        let (left_pts, right_pts) = partition(&points, at.segment);
        let (start, end) = match (self.model.vertex(a), self.model.vertex(b)) {
            (Some(s), Some(e)) => ((s.handle, s.position), (e.handle, e.position)),
            _ => return Err(GraphError::EdgeNotFound(edge)),
        };

        let uid = new_uid();
        let shape = self.settings.split_shape;
        let vh = self.store.create_vertex_shape(
            shape,
            at.point,
            self.settings.vertex_radius,
            metadata::vertex_tags("", &uid),
        )?;
        let mid = (vh, at.point);
        let mut created = vec![vh];
        let left = self.draw_or_discard(start, mid, &left_pts, &mut created)?;
        let right = self.draw_or_discard(mid, end, &right_pts, &mut created)?;
        let link = connect
            .and_then(|c| self.model.vertex(c))
            .map(|v| (v.handle, v.position));
        let connection = match link {
            Some(from) => Some(self.draw_or_discard(from, mid, &[], &mut created)?),
            None => None,
        };

        let nv = self
            .model
            .upsert_vertex(vh, Vertex::new(vh, at.point, shape).with_uid(uid));
        self.model.remove_edge(id);
        self.register_edge(Edge::new(left, a, nv).with_points(left_pts));
        self.register_edge(Edge::new(right, nv, b).with_points(right_pts));
        if let (Some(c), Some(h)) = (connect, connection) {
            self.register_edge(Edge::new(h, c, nv));
        }
        self.add_to_selection(nv);
        if let Err(err) = self.store.erase(edge) {
            debug!("split edge {} already gone from the drawing: {}", edge, err);
        }
        info!("split edge {} at segment {} into {} and {}", edge, at.segment, left, right);
        Ok(SplitOutcome { vertex: vh, left, right, connection })
    }

    fn draw_or_discard(
        &mut self,
        from: (Handle, Point3),
        to: (Handle, Point3),
        intermediates: &[Point3],
        created: &mut Vec<Handle>,
    ) -> Result<Handle> {
        match self.draw_polyline(from, to, intermediates) {
            Ok(h) => {
                created.push(h);
                Ok(h)
            }
            Err(err) => {
                self.discard(created);
                Err(err)
            }
        }
    }
}
