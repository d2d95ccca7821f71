use overlay::memory::{triangle_points, Geometry};
use overlay::metadata::{self, parse_vertex, Tag, APP_NAME};
use overlay::{Document, MemoryDrawing, Point3, Session, Shape, SpatialStore};

fn legacy_tags(label: &str, uid: &str) -> Vec<Tag> {
    vec![Tag::App(APP_NAME.into()), Tag::Text(label.into()), Tag::Text(uid.into())]
}

fn drawing() -> MemoryDrawing {
    let mut store = MemoryDrawing::new();
    let a = store
        .insert(
            Geometry::Circle { centre: Point3::xy(0.0, 0.0), radius: 1.0 },
            metadata::vertex_tags("A", "uid-a"),
        )
        .unwrap();
    let b = store
        .insert(
            Geometry::Polyline { points: triangle_points(Point3::xy(10.0, 0.0), 1.0).to_vec(), closed: true },
            legacy_tags("B", "uid-b"),
        )
        .unwrap();
    store
        .insert(
            Geometry::Polyline {
                points: vec![Point3::xy(0.0, 0.0), Point3::xy(5.0, 5.0), Point3::xy(10.0, 0.0)],
                closed: false,
            },
            metadata::edge_tags(a, b),
        )
        .unwrap();
    store
}

#[test]
fn restores_vertices_and_edges_with_intermediates() {
    let mut doc = Document::new(drawing());
    let summary = doc.restore().unwrap();
    assert_eq!(summary.vertices, 2);
    assert_eq!(summary.edges, 1);
    assert_eq!(summary.uids_assigned, 0);

    let a = doc.model().find_vertex_by_uid("uid-a").unwrap();
    let b = doc.model().find_vertex_by_uid("uid-b").unwrap();
    assert_eq!(doc.model().vertex(a).unwrap().label, "A");
    let vb = doc.model().vertex(b).unwrap();
    assert_eq!(vb.label, "B");
    assert!(vb.is_triangle());
    assert!((vb.position.x - 10.0).abs() < 1e-9);

    let (id, edge) = doc.model().edges().next().unwrap();
    assert_eq!(edge.points, vec![Point3::xy(5.0, 5.0)]);
    assert!(edge.joins(a, b));
    assert!((doc.model().edge_chord(id).unwrap() - 10.0).abs() < 1e-9);
    assert_eq!(doc.selection().len(), 2);
}

#[test]
fn missing_and_duplicate_uids_are_replaced() {
    let mut store = MemoryDrawing::new();
    let p = store
        .insert(Geometry::Circle { centre: Point3::ORIGIN, radius: 1.0 }, legacy_tags("p", ""))
        .unwrap();
    store
        .insert(Geometry::Circle { centre: Point3::xy(1.0, 0.0), radius: 1.0 }, metadata::vertex_tags("q", "same"))
        .unwrap();
    let r = store
        .insert(Geometry::Circle { centre: Point3::xy(2.0, 0.0), radius: 1.0 }, metadata::vertex_tags("r", "same"))
        .unwrap();
    let mut doc = Document::new(store);
    let summary = doc.restore().unwrap();
    assert_eq!(summary.vertices, 3);
    assert_eq!(summary.uids_assigned, 2);

    let mut uids: Vec<String> = doc.model().vertices().map(|(_, v)| v.uid.clone()).collect();
    uids.sort();
    uids.dedup();
    assert_eq!(uids.len(), 3);

    for h in [p, r] {
        let meta = parse_vertex(&doc.store().metadata(h).unwrap()).unwrap();
        assert_eq!(meta.uid.as_deref(), Some(doc.model().vertex_by_handle(h).unwrap().uid.as_str()));
    }
}

#[test]
fn dangling_edges_are_skipped() {
    let mut store = drawing();
    let orphan = store
        .insert(
            Geometry::Polyline { points: vec![Point3::ORIGIN, Point3::xy(1.0, 1.0)], closed: false },
            metadata::edge_tags(overlay::Handle(1), overlay::Handle(999)),
        )
        .unwrap();
    let mut doc = Document::new(store);
    let summary = doc.restore().unwrap();
    assert_eq!(summary.edges, 1);
    assert_eq!(summary.dangling_edges, 1);
    assert!(doc.model().edge_by_handle(orphan).is_none());
}

#[test]
fn untagged_entities_are_not_graph_elements() {
    let mut store = MemoryDrawing::new();
    store.insert(Geometry::Circle { centre: Point3::ORIGIN, radius: 3.0 }, vec![]).unwrap();
    store
        .insert(Geometry::Polyline { points: vec![Point3::ORIGIN, Point3::xy(1.0, 0.0)], closed: false }, vec![])
        .unwrap();
    let mut doc = Document::new(store);
    let summary = doc.restore().unwrap();
    assert_eq!((summary.vertices, summary.edges), (0, 0));
}

#[test]
fn restored_graph_survives_recreation() {
    let mut session: Session<MemoryDrawing> = Session::default();
    let (_, restored) = session.open(drawing());
    assert_eq!(restored.unwrap().edges, 1);
    let doc = session.document_mut().unwrap();
    let a = doc.model().vertices().next().map(|(_, v)| v.handle).unwrap();
    let a2 = doc.store_mut().recreate(a, Some(Shape::Triangle)).unwrap();
    session.pump();
    let doc = session.document_mut().unwrap();
    doc.sweep_erased();
    assert_eq!(doc.model().edge_count(), 1);
    assert!(doc.model().vertex_by_handle(a2).unwrap().is_triangle());
    assert_eq!(doc.model().find_vertex_by_uid("uid-a"), doc.model().vertex_id(a2));
}
