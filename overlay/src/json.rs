use crate::model::{Handle, Point3, Shape};
use crate::GraphModel;
use serde::Serialize;
use serde_json::Value;

pub fn dump_state_impl(g: &GraphModel, selection: &[Handle]) -> Value {
    #[derive(Serialize)]
    struct VertexSer<'a> {
        id: u32,
        handle: u64,
        uid: &'a str,
        label: &'a str,
        shape: Shape,
        position: Point3,
        edges: Vec<u64>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        erased: bool,
    }
    #[derive(Serialize)]
    struct EdgeSer<'a> {
        id: u32,
        handle: u64,
        start: u64,
        end: u64,
        points: &'a [Point3],
        length: f64,
    }
    #[derive(Serialize)]
    struct Doc<'a> {
        version: u32,
        vertices: Vec<VertexSer<'a>>,
        edges: Vec<EdgeSer<'a>>,
        selection: Vec<u64>,
    }
    let vertices = g
        .vertices()
        .map(|(id, v)| VertexSer {
            id,
            handle: v.handle.0,
            uid: &v.uid,
            label: &v.label,
            shape: v.shape,
            position: v.position,
            edges: v
                .attached
                .iter()
                .filter_map(|&e| g.edge(e).map(|e| e.handle.0))
                .collect(),
            erased: v.erased,
        })
        .collect();
    let edges = g
        .edges()
        .filter_map(|(id, e)| {
            let (start, end) = g.edge_endpoints(id)?;
            Some(EdgeSer {
                id,
                handle: e.handle.0,
                start: start.0,
                end: end.0,
                points: &e.points,
                length: g.edge_length(id).unwrap_or(0.0),
            })
        })
        .collect();
    let doc = Doc {
        version: 1,
        vertices,
        edges,
        selection: selection.iter().map(|h| h.0).collect(),
    };
    serde_json::to_value(&doc).unwrap_or(Value::Null)
}
