use overlay::metadata::parse_edge;
use overlay::{Document, GraphError, Handle, MemoryDrawing, Point3, Shape, SpatialStore};

const EPS: f64 = 1e-9;

fn close(a: Point3, b: Point3) -> bool {
    (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS && (a.z - b.z).abs() < EPS
}

fn straight() -> (Document<MemoryDrawing>, Handle, Handle, Handle) {
    let mut doc = Document::new(MemoryDrawing::new());
    let a = doc.create_vertex(Shape::Circle, Point3::xy(0.0, 0.0), "a").unwrap();
    let b = doc.create_vertex(Shape::Circle, Point3::xy(10.0, 0.0), "b").unwrap();
    let e = doc.create_edge(a, b, vec![]).unwrap();
    (doc, a, b, e)
}

#[test]
fn split_straight_edge_at_midpoint() {
    let (mut doc, a, b, e) = straight();
    let out = doc.split_edge(e, Point3::xy(5.0, 0.0), None).unwrap();

    let v = doc.model().vertex_by_handle(out.vertex).unwrap();
    assert!(close(v.position, Point3::xy(5.0, 0.0)));
    assert!(v.label.is_empty());
    assert!(!v.uid.is_empty());
    assert_eq!(v.shape, Shape::Circle);

    assert!(doc.model().edge_by_handle(e).is_none());
    assert!(!doc.store().contains(e));
    assert_eq!(doc.model().edge_count(), 2);

    let left = doc.store().points(out.left).unwrap();
    let right = doc.store().points(out.right).unwrap();
    assert_eq!(left.len(), 2);
    assert_eq!(right.len(), 2);
    assert!(close(left[0], Point3::xy(0.0, 0.0)));
    assert!(close(left[1], right[0]));
    assert!(close(right[1], Point3::xy(10.0, 0.0)));

    let l = parse_edge(&doc.store().metadata(out.left).unwrap()).unwrap();
    let r = parse_edge(&doc.store().metadata(out.right).unwrap()).unwrap();
    assert_eq!((l.start, l.end), (a, out.vertex));
    assert_eq!((r.start, r.end), (out.vertex, b));

    assert_eq!(doc.model().attached_edge_handles(a), vec![out.left]);
    assert_eq!(doc.model().attached_edge_handles(b), vec![out.right]);
    assert_eq!(doc.model().attached_edge_handles(out.vertex).len(), 2);
    assert!(doc.selection().contains(&out.vertex));
}

#[test]
fn split_keeps_intermediate_points() {
    let mut doc = Document::new(MemoryDrawing::new());
    let a = doc.create_vertex(Shape::Circle, Point3::xy(0.0, 0.0), "").unwrap();
    let b = doc.create_vertex(Shape::Circle, Point3::xy(30.0, 0.0), "").unwrap();
    let p1 = Point3::xy(10.0, 10.0);
    let p2 = Point3::xy(20.0, 10.0);
    let e = doc.create_edge(a, b, vec![p1, p2]).unwrap();

    let out = doc.split_edge(e, Point3::xy(15.0, 12.0), None).unwrap();
    let split_at = Point3::xy(15.0, 10.0);
    assert!(close(doc.model().vertex_by_handle(out.vertex).unwrap().position, split_at));

    let left = doc.model().edge_by_handle(out.left).unwrap();
    let right = doc.model().edge_by_handle(out.right).unwrap();
    assert_eq!(left.points, vec![p1]);
    assert_eq!(right.points, vec![p2]);

    let drawn = doc.store().points(out.left).unwrap();
    assert_eq!(drawn.len(), 3);
    assert!(close(drawn[2], split_at));
    let drawn = doc.store().points(out.right).unwrap();
    assert!(close(drawn[0], split_at));
    assert_eq!(drawn[1], p2);
}

#[test]
fn split_off_the_edge_projects_onto_nearest_segment() {
    let (mut doc, ..) = straight();
    let e = doc.model().edges().next().unwrap().1.handle;
    let out = doc.split_edge(e, Point3::xy(13.0, 4.0), None).unwrap();
    // clamped to the end of the only segment
    assert!(close(doc.model().vertex_by_handle(out.vertex).unwrap().position, Point3::xy(10.0, 0.0)));
}

#[test]
fn split_with_connecting_vertex() {
    let (mut doc, _, _, e) = straight();
    let c = doc.create_vertex(Shape::Triangle, Point3::xy(5.0, 8.0), "c").unwrap();
    let out = doc.split_edge(e, Point3::xy(5.0, 0.0), Some(c)).unwrap();
    let link = out.connection.expect("connection edge");
    let meta = parse_edge(&doc.store().metadata(link).unwrap()).unwrap();
    assert_eq!((meta.start, meta.end), (c, out.vertex));
    assert_eq!(doc.model().edge_count(), 3);
    assert_eq!(doc.model().attached_edge_handles(out.vertex).len(), 3);
}

#[test]
fn split_rolls_back_when_store_refuses() {
    let (mut doc, _, _, e) = straight();
    let before = doc.dump_state();
    let entities = doc.store().len();
    // vertex and left polyline succeed, right polyline fails
    doc.store_mut().limit_creates(Some(2));
    let err = doc.split_edge(e, Point3::xy(5.0, 0.0), None).unwrap_err();
    assert!(matches!(err, GraphError::Store(_)));
    doc.store_mut().limit_creates(None);
    assert_eq!(doc.dump_state(), before);
    assert_eq!(doc.store().len(), entities);
    assert!(doc.store().contains(e));
}

#[test]
fn split_rejects_unknown_edge_and_connector() {
    let (mut doc, a, _, e) = straight();
    assert_eq!(
        doc.split_edge(Handle(777), Point3::ORIGIN, None),
        Err(GraphError::EdgeNotFound(Handle(777)))
    );
    assert_eq!(
        doc.split_edge(a, Point3::ORIGIN, None),
        Err(GraphError::EdgeNotFound(a))
    );
    let before = doc.dump_state();
    assert_eq!(
        doc.split_edge(e, Point3::xy(5.0, 0.0), Some(Handle(778))),
        Err(GraphError::VertexNotFound(Handle(778)))
    );
    assert_eq!(doc.dump_state(), before);
}

#[test]
fn split_zero_length_edge() {
    let mut doc = Document::new(MemoryDrawing::new());
    let a = doc.create_vertex(Shape::Circle, Point3::xy(2.0, 2.0), "").unwrap();
    let b = doc.create_vertex(Shape::Circle, Point3::xy(2.0, 2.0), "").unwrap();
    let e = doc.create_edge(a, b, vec![]).unwrap();
    let out = doc.split_edge(e, Point3::xy(9.0, 9.0), None).unwrap();
    assert!(close(doc.model().vertex_by_handle(out.vertex).unwrap().position, Point3::xy(2.0, 2.0)));
}
