use crate::interop::{new_obj, set_kv};
use overlay::GraphError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn no_document() -> JsValue { err("no_document", "no document is open", None) }

/// Maps core errors onto envelope codes.
pub fn from_graph(e: &GraphError) -> JsValue {
    match e {
        GraphError::VertexNotFound(h) => invalid_id("vertex", h.0),
        GraphError::EdgeNotFound(h) => invalid_id("edge", h.0),
        GraphError::HandleNotFound(h) => invalid_id("element", h.0),
        GraphError::Path(p) => err("not_found", p.to_string(), None),
        GraphError::NoSegmentFound(_) => err("no_segment", e.to_string(), None),
        GraphError::SelfLoop(_) => err("invalid_edge", e.to_string(), None),
        GraphError::OutOfBounds => err("out_of_bounds", e.to_string(), None),
        GraphError::Limit(what) => {
            let d = new_obj(); set_kv(&d, "limit", &JsValue::from_str(what));
            err("limit", e.to_string(), Some(d.into()))
        }
        GraphError::Store(_) => err("store", e.to_string(), None),
    }
}
