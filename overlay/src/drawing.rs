//! Boundary to the external spatial store that owns the drawing entities.

use crate::metadata::Tag;
use crate::model::{Handle, Point3, Shape};
use serde::{Deserialize, Serialize};

pub use crate::error::StoreError;

/// Change notifications delivered by the spatial store, one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    Moved(Handle),
    Erased(Handle),
    Appended(Handle),
}

impl Notification {
    pub fn handle(&self) -> Handle {
        match *self {
            Notification::Moved(h) | Notification::Erased(h) | Notification::Appended(h) => h,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Circle,
    /// Closed three-point polyline.
    Triangle,
    Polyline,
    Other,
}

impl EntityKind {
    pub fn vertex_shape(self) -> Option<Shape> {
        match self {
            EntityKind::Circle => Some(Shape::Circle),
            EntityKind::Triangle => Some(Shape::Triangle),
            EntityKind::Polyline | EntityKind::Other => None,
        }
    }
}

/// External spatial store (the drawing database of the host editor).
///
/// Every query may fail with [`StoreError::Missing`] when the entity was
/// destroyed between a notification and its handling.
pub trait SpatialStore {
    /// All entity handles in drawing order.
    fn entities(&self) -> Vec<Handle>;

    fn kind(&self, handle: Handle) -> Result<EntityKind, StoreError>;

    /// Circle centre, or the average of a polyline's points.
    fn position(&self, handle: Handle) -> Result<Point3, StoreError>;

    /// Defining points of a polyline, in order.
    fn points(&self, handle: Handle) -> Result<Vec<Point3>, StoreError>;

    fn metadata(&self, handle: Handle) -> Result<Vec<Tag>, StoreError>;

    fn set_metadata(&mut self, handle: Handle, tags: Vec<Tag>) -> Result<(), StoreError>;

    fn create_vertex_shape(
        &mut self,
        shape: Shape,
        centre: Point3,
        radius: f64,
        tags: Vec<Tag>,
    ) -> Result<Handle, StoreError>;

    fn create_polyline(&mut self, points: &[Point3], tags: Vec<Tag>) -> Result<Handle, StoreError>;

    fn erase(&mut self, handle: Handle) -> Result<(), StoreError>;

    /// Starts queueing notifications for this consumer.
    fn subscribe(&mut self) {}

    /// Stops queueing notifications and drops pending ones.
    fn unsubscribe(&mut self) {}

    fn poll_notification(&mut self) -> Option<Notification> {
        None
    }
}
