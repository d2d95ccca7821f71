//! In-process spatial store. Behaves like a host drawing database: every
//! structural rewrite yields a fresh handle, and subscribed consumers get
//! queued notifications.

use crate::drawing::{EntityKind, Notification, SpatialStore, StoreError};
use crate::metadata::Tag;
use crate::model::{Handle, Point3, Shape};
use std::collections::{BTreeMap, VecDeque};

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Circle { centre: Point3, radius: f64 },
    Polyline { points: Vec<Point3>, closed: bool },
}

impl Geometry {
    fn kind(&self) -> EntityKind {
        match self {
            Geometry::Circle { .. } => EntityKind::Circle,
            Geometry::Polyline { points, closed: true } if points.len() == 3 => EntityKind::Triangle,
            Geometry::Polyline { .. } => EntityKind::Polyline,
        }
    }

    fn position(&self) -> Option<Point3> {
        match self {
            Geometry::Circle { centre, .. } => Some(*centre),
            Geometry::Polyline { points, .. } => {
                if points.is_empty() {
                    return None;
                }
                let n = points.len() as f64;
                let (sx, sy, sz) = points
                    .iter()
                    .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
                Some(Point3::new(sx / n, sy / n, sz / n))
            }
        }
    }

    fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        match self {
            Geometry::Circle { centre, .. } => {
                centre.x += dx;
                centre.y += dy;
                centre.z += dz;
            }
            Geometry::Polyline { points, .. } => {
                for p in points {
                    p.x += dx;
                    p.y += dy;
                    p.z += dz;
                }
            }
        }
    }

    /// Vertex geometry for `shape` centred on `centre`.
    pub fn vertex(shape: Shape, centre: Point3, radius: f64) -> Geometry {
        match shape {
            Shape::Circle => Geometry::Circle { centre, radius },
            Shape::Triangle => Geometry::Polyline {
                points: triangle_points(centre, radius).to_vec(),
                closed: true,
            },
        }
    }
}

/// Corners of an upward triangle inscribed in a circle of `radius`.
pub fn triangle_points(centre: Point3, radius: f64) -> [Point3; 3] {
    use std::f64::consts::PI;
    let corner = |angle: f64| {
        Point3::new(
            centre.x + radius * angle.cos(),
            centre.y + radius * angle.sin(),
            centre.z,
        )
    };
    [corner(PI / 2.0), corner(7.0 * PI / 6.0), corner(11.0 * PI / 6.0)]
}

#[derive(Clone, Debug)]
struct Entity {
    geometry: Geometry,
    tags: Vec<Tag>,
}

#[derive(Debug)]
pub struct MemoryDrawing {
    entities: BTreeMap<Handle, Entity>,
    next_handle: u64,
    subscribed: bool,
    queue: VecDeque<Notification>,
    create_budget: Option<usize>,
}

impl Default for MemoryDrawing {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDrawing {
    pub fn new() -> Self {
        MemoryDrawing {
            entities: BTreeMap::new(),
            next_handle: 1,
            subscribed: false,
            queue: VecDeque::new(),
            create_budget: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entities.contains_key(&handle)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn geometry(&self, handle: Handle) -> Option<&Geometry> {
        self.entities.get(&handle).map(|e| &e.geometry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Geometry)> {
        self.entities.iter().map(|(h, e)| (*h, &e.geometry))
    }

    /// Refuse entity creation after `n` more successful creations.
    pub fn limit_creates(&mut self, n: Option<usize>) {
        self.create_budget = n;
    }

    fn notify(&mut self, n: Notification) {
        if self.subscribed {
            self.queue.push_back(n);
        }
    }

    fn append(&mut self, geometry: Geometry, tags: Vec<Tag>) -> Result<Handle, StoreError> {
        if let Some(budget) = self.create_budget.as_mut() {
            if *budget == 0 {
                return Err(StoreError::Refused("creation budget exhausted".to_string()));
            }
            *budget -= 1;
        }
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        self.entities.insert(handle, Entity { geometry, tags });
        self.notify(Notification::Appended(handle));
        Ok(handle)
    }

    /// Appends an entity with raw geometry, as a host command would.
    pub fn insert(&mut self, geometry: Geometry, tags: Vec<Tag>) -> Result<Handle, StoreError> {
        self.append(geometry, tags)
    }

    /// Moves an entity so its position lands on `to`.
    pub fn move_entity(&mut self, handle: Handle, to: Point3) -> bool {
        let entity = match self.entities.get_mut(&handle) {
            Some(e) => e,
            None => return false,
        };
        let from = match entity.geometry.position() {
            Some(p) => p,
            None => return false,
        };
        entity
            .geometry
            .translate(to.x - from.x, to.y - from.y, to.z - from.z);
        self.notify(Notification::Moved(handle));
        true
    }

    /// Erases an entity and appends an equivalent one carrying the same
    /// metadata. With `shape`, a circle or triangle is rebuilt in that shape.
    pub fn recreate(&mut self, handle: Handle, shape: Option<Shape>) -> Option<Handle> {
        let entity = self.entities.get(&handle)?.clone();
        let geometry = match (shape, &entity.geometry) {
            (Some(shape), Geometry::Circle { centre, radius }) => {
                Geometry::vertex(shape, *centre, *radius)
            }
            (Some(shape), Geometry::Polyline { points, closed: true }) if points.len() == 3 => {
                let centre = entity.geometry.position()?;
                let radius = points.first().map_or(0.0, |p| {
                    crate::geometry::math::distance(centre, *p)
                });
                Geometry::vertex(shape, centre, radius)
            }
            (_, g) => g.clone(),
        };
        self.erase(handle).ok()?;
        self.append(geometry, entity.tags).ok()
    }

    /// Appends a copy of an entity, metadata included.
    pub fn copy_entity(&mut self, handle: Handle) -> Option<Handle> {
        let entity = self.entities.get(&handle)?.clone();
        self.append(entity.geometry, entity.tags).ok()
    }
}

impl SpatialStore for MemoryDrawing {
    fn entities(&self) -> Vec<Handle> {
        self.entities.keys().copied().collect()
    }

    fn kind(&self, handle: Handle) -> Result<EntityKind, StoreError> {
        self.entities
            .get(&handle)
            .map(|e| e.geometry.kind())
            .ok_or(StoreError::Missing(handle))
    }

    fn position(&self, handle: Handle) -> Result<Point3, StoreError> {
        let entity = self.entities.get(&handle).ok_or(StoreError::Missing(handle))?;
        entity.geometry.position().ok_or(StoreError::NoGeometry(handle))
    }

    fn points(&self, handle: Handle) -> Result<Vec<Point3>, StoreError> {
        match self.entities.get(&handle) {
            Some(Entity { geometry: Geometry::Polyline { points, .. }, .. }) => Ok(points.clone()),
            Some(_) => Err(StoreError::NoGeometry(handle)),
            None => Err(StoreError::Missing(handle)),
        }
    }

    fn metadata(&self, handle: Handle) -> Result<Vec<Tag>, StoreError> {
        self.entities
            .get(&handle)
            .map(|e| e.tags.clone())
            .ok_or(StoreError::Missing(handle))
    }

    fn set_metadata(&mut self, handle: Handle, tags: Vec<Tag>) -> Result<(), StoreError> {
        let entity = self.entities.get_mut(&handle).ok_or(StoreError::Missing(handle))?;
        entity.tags = tags;
        Ok(())
    }

    fn create_vertex_shape(
        &mut self,
        shape: Shape,
        centre: Point3,
        radius: f64,
        tags: Vec<Tag>,
    ) -> Result<Handle, StoreError> {
        self.append(Geometry::vertex(shape, centre, radius), tags)
    }

    fn create_polyline(&mut self, points: &[Point3], tags: Vec<Tag>) -> Result<Handle, StoreError> {
        if points.len() < 2 {
            return Err(StoreError::Refused("polyline needs two points".to_string()));
        }
        self.append(
            Geometry::Polyline {
                points: points.to_vec(),
                closed: false,
            },
            tags,
        )
    }

    fn erase(&mut self, handle: Handle) -> Result<(), StoreError> {
        self.entities.remove(&handle).ok_or(StoreError::Missing(handle))?;
        self.notify(Notification::Erased(handle));
        Ok(())
    }

    fn subscribe(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
        self.queue.clear();
    }

    fn poll_notification(&mut self) -> Option<Notification> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::math::distance;

    #[test]
    fn test_triangle_centroid_is_centre() {
        let mut d = MemoryDrawing::new();
        let c = Point3::xy(100.0, 50.0);
        let h = d.create_vertex_shape(Shape::Triangle, c, 10.0, Vec::new()).unwrap();
        assert_eq!(d.kind(h).unwrap(), EntityKind::Triangle);
        assert!(distance(d.position(h).unwrap(), c) < 1e-9);
    }

    #[test]
    fn test_notifications_only_while_subscribed() {
        let mut d = MemoryDrawing::new();
        let h = d.create_polyline(&[Point3::ORIGIN, Point3::xy(1.0, 0.0)], Vec::new()).unwrap();
        assert_eq!(d.pending(), 0);
        d.subscribe();
        assert!(d.move_entity(h, Point3::xy(5.0, 5.0)));
        d.erase(h).unwrap();
        assert_eq!(d.poll_notification(), Some(Notification::Moved(h)));
        assert_eq!(d.poll_notification(), Some(Notification::Erased(h)));
        assert_eq!(d.poll_notification(), None);
        d.move_entity(h, Point3::ORIGIN);
        d.unsubscribe();
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn test_recreate_issues_fresh_handle() {
        let mut d = MemoryDrawing::new();
        let tags = vec![Tag::Text("t".into())];
        let h = d
            .create_vertex_shape(Shape::Circle, Point3::xy(1.0, 2.0), 5.0, tags.clone())
            .unwrap();
        let h2 = d.recreate(h, Some(Shape::Triangle)).unwrap();
        assert_ne!(h, h2);
        assert!(!d.contains(h));
        assert_eq!(d.kind(h2).unwrap(), EntityKind::Triangle);
        assert_eq!(d.metadata(h2).unwrap(), tags);
        assert!(distance(d.position(h2).unwrap(), Point3::xy(1.0, 2.0)) < 1e-9);
    }

    #[test]
    fn test_creation_budget() {
        let mut d = MemoryDrawing::new();
        d.limit_creates(Some(1));
        assert!(d.create_vertex_shape(Shape::Circle, Point3::ORIGIN, 1.0, Vec::new()).is_ok());
        assert!(matches!(
            d.create_vertex_shape(Shape::Circle, Point3::ORIGIN, 1.0, Vec::new()),
            Err(StoreError::Refused(_))
        ));
    }
}
