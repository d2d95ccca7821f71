//! Persisted tag sequences that mark drawing entities as graph elements.
//!
//! A vertex representation carries
//! `[App(VERTEX_APP), App(APP_NAME), Text(label), Text(uid)]`; an edge
//! representation carries `[App(EDGE_APP), Text(start), Text(end)]` with the
//! endpoint handles written as decimal strings. Older writers omitted the
//! vertex marker and wrote only `[App(APP_NAME), Text(label), Text(uid)]`,
//! so vertex parsing falls back to that layout.

use crate::model::Handle;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "OVERLAY_APP";
pub const VERTEX_APP: &str = "OVERLAY_VERTEX";
pub const EDGE_APP: &str = "OVERLAY_EDGE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Tag {
    /// Application marker.
    App(String),
    /// Free text payload.
    Text(String),
}

impl Tag {
    fn is_app(&self, name: &str) -> bool {
        matches!(self, Tag::App(n) if n == name)
    }

    fn text(&self) -> Option<&str> {
        match self {
            Tag::Text(s) => Some(s),
            Tag::App(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexMeta {
    pub label: String,
    /// `None` when the writer left no uid (or an empty one).
    pub uid: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeMeta {
    pub start: Handle,
    pub end: Handle,
}

pub fn vertex_tags(label: &str, uid: &str) -> Vec<Tag> {
    vec![
        Tag::App(VERTEX_APP.to_string()),
        Tag::App(APP_NAME.to_string()),
        Tag::Text(label.to_string()),
        Tag::Text(uid.to_string()),
    ]
}

pub fn edge_tags(start: Handle, end: Handle) -> Vec<Tag> {
    vec![
        Tag::App(EDGE_APP.to_string()),
        Tag::Text(start.to_string()),
        Tag::Text(end.to_string()),
    ]
}

// Reads up to two text payloads (label, uid) starting at `from`.
fn read_label_uid(tags: &[Tag], from: usize) -> VertexMeta {
    let mut meta = VertexMeta::default();
    let mut j = from;
    if let Some(label) = tags.get(j).and_then(Tag::text) {
        meta.label = label.to_string();
        j += 1;
        if let Some(uid) = tags.get(j).and_then(Tag::text) {
            if !uid.trim().is_empty() {
                meta.uid = Some(uid.to_string());
            }
        }
    }
    meta
}

/// Parses vertex metadata; `None` means "not a tracked vertex".
pub fn parse_vertex(tags: &[Tag]) -> Option<VertexMeta> {
    // Current layout: vertex marker, then the application block.
    if let Some(i) = tags.iter().position(|t| t.is_app(VERTEX_APP)) {
        let j = i + 1;
        if tags.get(j).map_or(false, |t| t.is_app(APP_NAME)) {
            return Some(read_label_uid(tags, j + 1));
        }
        return Some(VertexMeta::default());
    }
    // Legacy layout: application block only.
    let i = tags.iter().position(|t| t.is_app(APP_NAME))?;
    Some(read_label_uid(tags, i + 1))
}

/// Parses edge metadata; both endpoint handles must be present.
pub fn parse_edge(tags: &[Tag]) -> Option<EdgeMeta> {
    let i = tags.iter().position(|t| t.is_app(EDGE_APP))?;
    let mut found = tags[i + 1..]
        .iter()
        .filter_map(Tag::text)
        .filter_map(|s| s.parse::<Handle>().ok());
    let start = found.next()?;
    let end = found.next()?;
    Some(EdgeMeta { start, end })
}
