//! Lifecycle of the current document: at most one store is subscribed at a
//! time, and switching stores detaches the old one first.

use crate::algorithms::restore::RestoreSummary;
use crate::config::Settings;
use crate::document::Document;
use crate::drawing::SpatialStore;
use crate::error::Result;
use log::info;

pub struct Session<S: SpatialStore> {
    settings: Settings,
    current: Option<Document<S>>,
}

impl<S: SpatialStore> Default for Session<S> {
    fn default() -> Self {
        Session::new(Settings::default())
    }
}

impl<S: SpatialStore> Session<S> {
    pub fn new(settings: Settings) -> Self {
        Session { settings, current: None }
    }

    /// Makes `store` current and rebuilds its graph. The previous store is
    /// unsubscribed and handed back.
    ///
    /// If the restore fails the store stays current with an empty graph.
    pub fn open(&mut self, mut store: S) -> (Option<S>, Result<RestoreSummary>) {
        let previous = self.close();
        store.subscribe();
        let mut doc = Document::with_settings(store, self.settings.clone());
        let restored = doc.restore();
        if let Ok(summary) = &restored {
            info!("opened document with {} vertices", summary.vertices);
        }
        self.current = Some(doc);
        (previous, restored)
    }

    /// Detaches the current store, if any, and returns it.
    pub fn close(&mut self) -> Option<S> {
        let doc = self.current.take()?;
        let mut store = doc.into_store();
        store.unsubscribe();
        Some(store)
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn document(&self) -> Option<&Document<S>> {
        self.current.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document<S>> {
        self.current.as_mut()
    }

    /// Delivers every queued notification of the current store.
    pub fn pump(&mut self) -> usize {
        self.current.as_mut().map_or(0, Document::pump)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point3, Shape};
    use crate::MemoryDrawing;

    #[test]
    fn test_open_subscribes_and_close_detaches() {
        let mut s: Session<MemoryDrawing> = Session::default();
        let (prev, res) = s.open(MemoryDrawing::new());
        assert!(prev.is_none());
        assert!(res.is_ok());
        assert!(s.document().unwrap().store().is_subscribed());
        let store = s.close().unwrap();
        assert!(!store.is_subscribed());
        assert!(!s.is_open());
    }

    #[test]
    fn test_switch_detaches_previous() {
        let mut s: Session<MemoryDrawing> = Session::default();
        s.open(MemoryDrawing::new());
        let doc = s.document_mut().unwrap();
        doc.create_vertex(Shape::Circle, Point3::xy(1.0, 1.0), "a").unwrap();
        let (prev, _) = s.open(MemoryDrawing::new());
        let prev = prev.unwrap();
        assert!(!prev.is_subscribed());
        assert_eq!(prev.pending(), 0);
        assert_eq!(prev.len(), 1);
        assert_eq!(s.document().unwrap().model().vertex_count(), 0);
    }
}
