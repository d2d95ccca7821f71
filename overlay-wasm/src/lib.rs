use overlay::{Document, MemoryDrawing, Session, Settings};
use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod logging;

#[wasm_bindgen]
pub struct Editor { pub(crate) inner: Session<MemoryDrawing> }

impl Editor {
    pub fn rs_new(settings: Settings) -> Editor {
        let mut editor = Editor { inner: Session::new(settings) };
        editor.open_empty();
        editor
    }

    pub(crate) fn open_empty(&mut self) {
        let (_, restored) = self.inner.open(MemoryDrawing::new());
        if let Err(e) = restored {
            log::warn!("restore of empty drawing failed: {}", e);
        }
    }
    pub(crate) fn doc(&self) -> Option<&Document<MemoryDrawing>> { self.inner.document() }
    pub(crate) fn doc_mut(&mut self) -> Option<&mut Document<MemoryDrawing>> { self.inner.document_mut() }

    /// Runs one host edit against the drawing, then reconciles: queued
    /// notifications are delivered and tombstones left behind are swept.
    pub(crate) fn edit<T>(&mut self, f: impl FnOnce(&mut Document<MemoryDrawing>) -> T) -> Option<T> {
        let out = f(self.inner.document_mut()?);
        self.inner.pump();
        if let Some(doc) = self.inner.document_mut() { doc.sweep_erased(); }
        Some(out)
    }
}
