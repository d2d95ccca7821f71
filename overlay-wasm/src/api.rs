use crate::error;
use crate::interop::{arr_f64, arr_u32, arr_u8, handle, handle_id, new_obj, points_xy, set_kv};
use crate::Editor;
use overlay::algorithms::split::SplitOutcome;
use overlay::{GraphError, Handle, Point3, Settings, Shape, SpatialStore};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn shape(triangle: bool) -> Shape { if triangle { Shape::Triangle } else { Shape::Circle } }

fn id_value(h: Handle) -> JsValue { JsValue::from_f64(handle_id(h) as f64) }

fn respond<T>(r: Option<Result<T, GraphError>>, f: impl FnOnce(T) -> JsValue) -> JsValue {
    match r {
        None => error::no_document(),
        Some(Ok(v)) => error::ok(f(v)),
        Some(Err(e)) => error::from_graph(&e),
    }
}

fn split_value(out: &SplitOutcome) -> JsValue {
    let o = new_obj();
    set_kv(&o, "vertex", &id_value(out.vertex));
    set_kv(&o, "left", &id_value(out.left));
    set_kv(&o, "right", &id_value(out.right));
    set_kv(&o, "connection", &out.connection.map_or(JsValue::NULL, id_value));
    o.into()
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Editor {
        let settings = match settings_json.as_deref().map(Settings::from_json_str) {
            Some(Ok(s)) => s,
            Some(Err(e)) => {
                log::warn!("ignoring settings: {}", e);
                Settings::default()
            }
            None => Settings::default(),
        };
        Editor::rs_new(settings)
    }

    /// Starts over with an empty drawing.
    pub fn reset(&mut self) { self.open_empty(); }

    pub fn vertex_count(&self) -> u32 { self.doc().map_or(0, |d| d.model().vertex_count() as u32) }
    pub fn edge_count(&self) -> u32 { self.doc().map_or(0, |d| d.model().edge_count() as u32) }

    // Commands
    pub fn add_vertex(&mut self, x: f64, y: f64, triangle: bool, label: &str) -> Option<u32> {
        self.edit(|d| d.create_vertex(shape(triangle), Point3::xy(x, y), label).ok())
            .flatten()
            .map(handle_id)
    }
    pub fn add_vertex_res(&mut self, x: f64, y: f64, triangle: bool, label: &str) -> JsValue {
        if !x.is_finite() { return error::non_finite("x"); }
        if !y.is_finite() { return error::non_finite("y"); }
        let r = self.edit(|d| d.create_vertex(shape(triangle), Point3::xy(x, y), label));
        respond(r, id_value)
    }
    pub fn connect(&mut self, a: u32, b: u32) -> Option<u32> {
        self.edit(|d| d.create_edge(handle(a), handle(b), Vec::new()).ok())
            .flatten()
            .map(handle_id)
    }
    pub fn connect_res(&mut self, a: u32, b: u32) -> JsValue {
        self.connect_via_res(a, b, &[])
    }
    /// `points` holds the intermediate points as `[x0, y0, x1, y1, ..]`.
    pub fn connect_via_res(&mut self, a: u32, b: u32, points: &[f64]) -> JsValue {
        if points.iter().any(|v| !v.is_finite()) { return error::non_finite("points"); }
        let pts = points_xy(points);
        let r = self.edit(|d| d.create_edge(handle(a), handle(b), pts));
        respond(r, id_value)
    }
    pub fn split(&mut self, edge: u32, x: f64, y: f64, connect: Option<u32>) -> JsValue {
        self.edit(|d| d.split_edge(handle(edge), Point3::xy(x, y), connect.map(handle)).ok())
            .flatten()
            .map_or(JsValue::NULL, |o| split_value(&o))
    }
    pub fn split_res(&mut self, edge: u32, x: f64, y: f64, connect: Option<u32>) -> JsValue {
        if !x.is_finite() { return error::non_finite("x"); }
        if !y.is_finite() { return error::non_finite("y"); }
        let r = self.edit(|d| d.split_edge(handle(edge), Point3::xy(x, y), connect.map(handle)));
        respond(r, |o| split_value(&o))
    }
    pub fn delete_element_res(&mut self, h: u32) -> JsValue {
        let r = self.edit(|d| d.delete_element(handle(h)));
        respond(r, |_| JsValue::TRUE)
    }
    pub fn change_shape(&mut self, h: u32) -> Option<u32> {
        self.edit(|d| d.change_shape(handle(h)).ok()).flatten().map(handle_id)
    }
    pub fn change_shape_res(&mut self, h: u32) -> JsValue {
        let r = self.edit(|d| d.change_shape(handle(h)));
        respond(r, id_value)
    }
    pub fn ensure_uids(&mut self) -> u32 { self.edit(|d| d.ensure_uids() as u32).unwrap_or(0) }
    pub fn refresh_edges(&mut self) -> u32 { self.edit(|d| d.refresh_edges() as u32).unwrap_or(0) }

    // Host edits: the drawing changes first, the graph follows through notifications
    pub fn move_vertex(&mut self, h: u32, x: f64, y: f64) -> bool {
        self.edit(|d| d.store_mut().move_entity(handle(h), Point3::xy(x, y))).unwrap_or(false)
    }
    pub fn move_vertex_res(&mut self, h: u32, x: f64, y: f64) -> JsValue {
        if !x.is_finite() { return error::non_finite("x"); }
        if !y.is_finite() { return error::non_finite("y"); }
        if self.doc().and_then(|d| d.model().vertex_by_handle(handle(h))).is_none() {
            return error::invalid_id("vertex", h as u64);
        }
        error::ok(JsValue::from_bool(self.move_vertex(h, x, y)))
    }
    pub fn erase(&mut self, h: u32) -> bool {
        self.edit(|d| d.store_mut().erase(handle(h)).is_ok()).unwrap_or(false)
    }
    pub fn erase_res(&mut self, h: u32) -> JsValue {
        if !self.doc().map_or(false, |d| d.store().contains(handle(h))) {
            return error::invalid_id("entity", h as u64);
        }
        error::ok(JsValue::from_bool(self.erase(h)))
    }
    /// Erases and re-appends the entity with the same metadata and a new handle.
    pub fn recreate(&mut self, h: u32) -> Option<u32> {
        self.edit(|d| d.store_mut().recreate(handle(h), None)).flatten().map(handle_id)
    }

    // Queries
    pub fn find_path(&self, a: u32, b: u32) -> JsValue {
        match self.doc().map(|d| d.find_path(handle(a), handle(b))) {
            Some(Ok(p)) => serde_wasm_bindgen::to_value(&p).unwrap_or(JsValue::NULL),
            _ => JsValue::NULL,
        }
    }
    pub fn find_path_res(&self, a: u32, b: u32) -> JsValue {
        let r = self.doc().map(|d| d.find_path(handle(a), handle(b)));
        respond(r, |p| serde_wasm_bindgen::to_value(&p).unwrap_or(JsValue::NULL))
    }
    pub fn pick(&self, x: f64, y: f64, tol: f64) -> JsValue {
        match self.doc().and_then(|d| d.pick(Point3::xy(x, y), tol)) {
            Some(p) => serde_wasm_bindgen::to_value(&p).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }
    pub fn pick_res(&self, x: f64, y: f64, tol: f64) -> JsValue {
        if !x.is_finite() { return error::non_finite("x"); }
        if !y.is_finite() { return error::non_finite("y"); }
        if !tol.is_finite() || tol < 0.0 { return error::out_of_range("tol", 0.0, f64::MAX, tol); }
        error::ok(self.pick(x, y, tol))
    }
    pub fn selection(&self) -> Vec<u32> {
        self.doc().map_or_else(Vec::new, |d| d.selection().into_iter().map(handle_id).collect())
    }

    // Typed arrays getters
    pub fn get_vertex_data(&self) -> JsValue {
        let (mut ids, mut pos, mut shapes) = (Vec::new(), Vec::new(), Vec::new());
        if let Some(d) = self.doc() {
            for (_, v) in d.model().vertices() {
                ids.push(handle_id(v.handle));
                pos.extend_from_slice(&[v.position.x, v.position.y, v.position.z]);
                shapes.push(v.is_triangle() as u8);
            }
        }
        let obj = new_obj();
        set_kv(&obj, "handles", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        set_kv(&obj, "triangles", &arr_u8(&shapes).into());
        obj.into()
    }
    /// Edge handles, endpoint handle pairs, and the full drawn path of each
    /// edge as xy pairs; `offsets[i]` is the first point of edge `i`.
    pub fn get_edge_data(&self) -> JsValue {
        let (mut ids, mut ends, mut offsets, mut pts) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        if let Some(d) = self.doc() {
            let g = d.model();
            for (id, e) in g.edges() {
                let (Some((s, t)), Some(path)) = (g.edge_endpoints(id), g.edge_polyline(id)) else { continue };
                ids.push(handle_id(e.handle));
                ends.extend_from_slice(&[handle_id(s), handle_id(t)]);
                offsets.push((pts.len() / 2) as u32);
                for p in path { pts.extend_from_slice(&[p.x, p.y]); }
            }
        }
        let obj = new_obj();
        set_kv(&obj, "handles", &arr_u32(&ids).into());
        set_kv(&obj, "endpoints", &arr_u32(&ends).into());
        set_kv(&obj, "offsets", &arr_u32(&offsets).into());
        set_kv(&obj, "points", &arr_f64(&pts).into());
        obj.into()
    }
    pub fn dump_state(&self) -> String {
        self.doc().map_or_else(String::new, |d| d.dump_state().to_string())
    }
    pub fn restore_res(&mut self) -> JsValue {
        let r = self.doc_mut().map(|d| d.restore());
        respond(r, |s| {
            let o = new_obj();
            set_kv(&o, "vertices", &JsValue::from_f64(s.vertices as f64));
            set_kv(&o, "edges", &JsValue::from_f64(s.edges as f64));
            set_kv(&o, "uids_assigned", &JsValue::from_f64(s.uids_assigned as f64));
            set_kv(&o, "dangling_edges", &JsValue::from_f64(s.dangling_edges as f64));
            o.into()
        })
    }
}
