use js_sys::{Float64Array, Object, Reflect, Uint32Array, Uint8Array};
use overlay::{Handle, Point3};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_u8(slice: &[u8]) -> Uint8Array {
    let arr = Uint8Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}

/// Handles cross the boundary as u32; the in-memory drawing never gets near
/// the limit.
pub fn handle_id(h: Handle) -> u32 { u32::try_from(h.0).unwrap_or(u32::MAX) }
pub fn handle(id: u32) -> Handle { Handle(id as u64) }

/// Pairs of `[x0, y0, x1, y1, ..]` as planar points; a trailing odd value is dropped.
pub fn points_xy(flat: &[f64]) -> Vec<Point3> {
    flat.chunks_exact(2).map(|c| Point3::xy(c[0], c[1])).collect()
}
