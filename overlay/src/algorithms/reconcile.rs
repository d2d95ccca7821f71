//! Keeps the graph model consistent with the spatial store as entities are
//! moved, erased and recreated behind its back.
//!
//! Every notification either fully applies or leaves the model untouched.
//! Unknown handles and transient store failures are never errors.

use crate::document::Document;
use crate::drawing::{Notification, SpatialStore};
use crate::error::{GraphError, Result};
use crate::geometry::math::moved_beyond;
use crate::metadata::parse_vertex;
use crate::model::{EdgeId, Handle, Point3, VertexId};
use log::{debug, warn};

/// What a single notification did to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// The handle is not tracked, or the appended entity carries no known uid.
    Ignored,
    /// The store could not answer; prior state kept.
    Skipped,
    /// Tracked, but nothing changed (noise-level move, same-handle append).
    Unchanged,
    Moved { edges: usize },
    VertexErased,
    /// A tombstoned vertex reappeared under its own handle.
    Revived,
    EdgeRemoved,
    Rekeyed { from: Handle, to: Handle, edges: usize },
}

impl<S: SpatialStore> Document<S> {
    pub fn handle_notification(&mut self, note: Notification) -> Reconciled {
        let outcome = match note {
            Notification::Moved(h) => self.on_moved(h),
            Notification::Erased(h) => self.on_erased(h),
            Notification::Appended(h) => self.on_appended(h),
        };
        debug!("{:?} -> {:?}", note, outcome);
        outcome
    }

    /// Drains queued store notifications. Handling may queue more (edge
    /// resync appends and erases); those are drained too.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(note) = self.store.poll_notification() {
            self.handle_notification(note);
            handled += 1;
        }
        handled
    }

    fn on_moved(&mut self, handle: Handle) -> Reconciled {
        let Some(id) = self.model.vertex_id(handle) else {
            return Reconciled::Ignored;
        };
        let old = match self.model.vertex(id) {
            Some(v) => v.position,
            None => return Reconciled::Ignored,
        };
        let new = match self.store.position(handle) {
            Ok(p) => p,
            Err(err) => {
                debug!("position of {} unavailable: {}", handle, err);
                return Reconciled::Skipped;
            }
        };
        if !moved_beyond(old, new, self.settings.move_epsilon) {
            return Reconciled::Unchanged;
        }
        let drawn = match self.redraw_attached(id, new) {
            Ok(drawn) => drawn,
            Err(err) => {
                warn!("move of {} not applied: {}", handle, err);
                return Reconciled::Skipped;
            }
        };
        if let Some(v) = self.model.vertex_mut(id) {
            v.position = new;
        }
        let edges = drawn.into_iter().filter(|&(e, h)| self.swap_edge(e, h)).count();
        Reconciled::Moved { edges }
    }

    fn on_erased(&mut self, handle: Handle) -> Reconciled {
        if let Some(id) = self.model.vertex_id(handle) {
            if let Some(v) = self.model.vertex_mut(id) {
                v.erased = true;
            }
            self.drop_from_selection(id);
            return Reconciled::VertexErased;
        }
        match self.model.remove_edge_by_handle(handle) {
            Some(_) => Reconciled::EdgeRemoved,
            None => Reconciled::Ignored,
        }
    }

    fn on_appended(&mut self, handle: Handle) -> Reconciled {
        let tags = match self.store.metadata(handle) {
            Ok(tags) => tags,
            Err(err) => {
                debug!("metadata of {} unavailable: {}", handle, err);
                return Reconciled::Skipped;
            }
        };
        let Some(uid) = parse_vertex(&tags).and_then(|m| m.uid) else {
            return Reconciled::Ignored;
        };
        let Some(id) = self.model.find_vertex_by_uid(&uid) else {
            return Reconciled::Ignored;
        };
        match self.model.vertex_id(handle) {
            Some(owner) if owner == id => return self.revive_in_place(id),
            Some(owner) => {
                warn!("{} is already tracked as vertex {}; uid {} left alone", handle, owner, uid);
                return Reconciled::Ignored;
            }
            None => {}
        }
        let from = match self.model.vertex(id) {
            Some(v) => v.handle,
            None => return Reconciled::Ignored,
        };
        match self.rekey(id, handle) {
            Some(edges) => Reconciled::Rekeyed { from, to: handle, edges },
            None => Reconciled::Ignored,
        }
    }

    /// The entity came back under the handle the vertex already has, as
    /// after an undone erase.
    fn revive_in_place(&mut self, id: VertexId) -> Reconciled {
        match self.model.vertex_mut(id) {
            Some(v) if v.erased => v.erased = false,
            _ => return Reconciled::Unchanged,
        }
        self.add_to_selection(id);
        debug!("vertex {} revived in place", id);
        Reconciled::Revived
    }

    /// Moves vertex `id` to `new_handle`, revives it, and redraws every
    /// attached edge against the new representation. Returns the number of
    /// edges resynchronized, or `None` if the handle is taken.
    pub(crate) fn rekey(&mut self, id: VertexId, new_handle: Handle) -> Option<usize> {
        let from = self.model.vertex(id)?.handle;
        if !self.model.rekey_vertex(id, new_handle) {
            return None;
        }
        let shape = self.store.kind(new_handle).ok().and_then(|k| k.vertex_shape());
        let position = self.store.position(new_handle).ok();
        if let Some(v) = self.model.vertex_mut(id) {
            v.erased = false;
            if let Some(shape) = shape {
                v.shape = shape;
            }
            if let Some(p) = position {
                v.position = p;
            }
        }
        self.add_to_selection(id);
        let edges = self.resync_attached(id);
        debug!("rekeyed vertex {} -> {} ({} edges)", from, new_handle, edges);
        Some(edges)
    }

    fn resync_attached(&mut self, id: VertexId) -> usize {
        let attached = match self.model.vertex(id) {
            Some(v) => v.attached.clone(),
            None => return 0,
        };
        attached.into_iter().filter(|&e| self.resync_edge(e)).count()
    }

    /// Draws a replacement polyline for every edge attached to `id` as if
    /// the vertex stood at `at`. On failure nothing drawn so far is kept.
    fn redraw_attached(&mut self, id: VertexId, at: Point3) -> Result<Vec<(EdgeId, Handle)>> {
        let attached = match self.model.vertex(id) {
            Some(v) => v.attached.clone(),
            None => return Ok(Vec::new()),
        };
        let mut drawn = Vec::with_capacity(attached.len());
        for e in attached {
            match self.draw_with_moved_end(e, id, at) {
                Ok(h) => drawn.push((e, h)),
                Err(err) => {
                    let handles: Vec<Handle> = drawn.iter().map(|&(_, h)| h).collect();
                    self.discard(&handles);
                    return Err(err);
                }
            }
        }
        Ok(drawn)
    }

    fn draw_with_moved_end(&mut self, e: EdgeId, moved: VertexId, at: Point3) -> Result<Handle> {
        let (a, b, points) = match self.model.edge(e) {
            Some(edge) => (edge.a, edge.b, edge.points.clone()),
            None => return Err(GraphError::EdgeNotFound(Handle(0))),
        };
        let mut start = self.vertex_anchor(a)?;
        let mut end = self.vertex_anchor(b)?;
        if a == moved {
            start.1 = at;
        }
        if b == moved {
            end.1 = at;
        }
        self.draw_polyline(start, end, &points)
    }

    /// Replaces an edge's polyline with one drawn through the current cached
    /// endpoint positions, tagged with the current endpoint handles.
    pub(crate) fn resync_edge(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.model.edge(id) else {
            return false;
        };
        let (old, a, b, points) = (edge.handle, edge.a, edge.b, edge.points.clone());
        match self.draw_edge(a, b, &points) {
            Ok(new) => self.swap_edge(id, new),
            Err(err) => {
                warn!("could not redraw edge {}: {}", old, err);
                false
            }
        }
    }

    /// Points edge `id` at the freshly drawn `new` polyline and erases the
    /// old one. `new` is discarded if the model refuses it.
    fn swap_edge(&mut self, id: EdgeId, new: Handle) -> bool {
        let Some(old) = self.model.edge(id).map(|edge| edge.handle) else {
            self.discard(&[new]);
            return false;
        };
        if !self.model.rekey_edge(id, new) {
            self.discard(&[new]);
            return false;
        }
        if let Err(err) = self.store.erase(old) {
            debug!("stale edge {} already gone: {}", old, err);
        }
        true
    }
}
