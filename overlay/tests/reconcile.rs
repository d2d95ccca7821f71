use overlay::algorithms::reconcile::Reconciled;
use overlay::memory::Geometry;
use overlay::metadata::{self, parse_edge, Tag};
use overlay::{Document, Handle, MemoryDrawing, Notification, Point3, Shape, SpatialStore};

fn subscribed() -> MemoryDrawing {
    let mut store = MemoryDrawing::new();
    store.subscribe();
    store
}

fn two_vertices(store: MemoryDrawing) -> (Document<MemoryDrawing>, Handle, Handle, Handle) {
    let mut doc = Document::new(store);
    let a = doc.create_vertex(Shape::Circle, Point3::xy(0.0, 0.0), "a").unwrap();
    let b = doc.create_vertex(Shape::Circle, Point3::xy(10.0, 0.0), "b").unwrap();
    let e = doc.create_edge(a, b, vec![Point3::xy(5.0, 3.0)]).unwrap();
    doc.pump();
    (doc, a, b, e)
}

fn only_edge(doc: &Document<MemoryDrawing>) -> (Handle, Handle, Handle) {
    let (id, edge) = doc.model().edges().next().expect("one edge");
    let (s, e) = doc.model().edge_endpoints(id).unwrap();
    (edge.handle, s, e)
}

#[test]
fn rekey_without_erase_moves_vertex_and_edge() {
    let (mut doc, a, b, _) = two_vertices(MemoryDrawing::new());
    let uid = doc.model().vertex_by_handle(a).unwrap().uid.clone();
    // a second representation with the same uid; H1 is simply stale
    let a2 = doc.store_mut().copy_entity(a).unwrap();

    let out = doc.handle_notification(Notification::Appended(a2));
    assert_eq!(out, Reconciled::Rekeyed { from: a, to: a2, edges: 1 });

    assert!(doc.model().vertex_by_handle(a).is_none());
    let v = doc.model().vertex_by_handle(a2).unwrap();
    assert_eq!(v.uid, uid);
    assert_eq!(v.label, "a");
    assert!(!v.erased);

    let (edge, start, end) = only_edge(&doc);
    assert_eq!((start, end), (a2, b));
    let tags = doc.store().metadata(edge).unwrap();
    let meta = parse_edge(&tags).unwrap();
    assert_eq!((meta.start, meta.end), (a2, b));
    // geometry keeps its intermediate point
    assert_eq!(doc.store().points(edge).unwrap().len(), 3);
    assert_eq!(doc.model().attached_edge_handles(a2), vec![edge]);
}

#[test]
fn append_with_unknown_uid_changes_nothing() {
    let (mut doc, ..) = two_vertices(MemoryDrawing::new());
    let before = doc.dump_state();
    let stranger = doc
        .store_mut()
        .insert(
            Geometry::Circle { centre: Point3::xy(3.0, 3.0), radius: 1.0 },
            metadata::vertex_tags("x", "no-such-uid"),
        )
        .unwrap();
    let plain = doc
        .store_mut()
        .insert(Geometry::Circle { centre: Point3::xy(4.0, 4.0), radius: 1.0 }, vec![])
        .unwrap();
    assert_eq!(doc.handle_notification(Notification::Appended(stranger)), Reconciled::Ignored);
    assert_eq!(doc.handle_notification(Notification::Appended(plain)), Reconciled::Ignored);
    assert_eq!(doc.dump_state(), before);
}

#[test]
fn malformed_metadata_is_ignored() {
    let (mut doc, ..) = two_vertices(MemoryDrawing::new());
    let before = doc.dump_state();
    let junk = doc
        .store_mut()
        .insert(
            Geometry::Circle { centre: Point3::ORIGIN, radius: 1.0 },
            vec![Tag::Text("garbage".into()), Tag::App("SOMEONE_ELSE".into())],
        )
        .unwrap();
    assert_eq!(doc.handle_notification(Notification::Appended(junk)), Reconciled::Ignored);
    assert_eq!(doc.dump_state(), before);
}

#[test]
fn host_recreate_revives_vertex() {
    let (mut doc, a, b, _) = two_vertices(subscribed());
    let a2 = doc.store_mut().recreate(a, Some(Shape::Triangle)).unwrap();
    doc.pump();
    assert_eq!(doc.sweep_erased(), 0);

    let v = doc.model().vertex_by_handle(a2).unwrap();
    assert!(!v.erased);
    assert!(v.is_triangle());
    assert!(doc.selection().contains(&a2));
    let (edge, start, end) = only_edge(&doc);
    assert_eq!((start, end), (a2, b));
    assert!(doc.store().contains(edge));
    assert_eq!(doc.store().pending(), 0);
}

#[test]
fn reappend_under_same_handle_revives_tombstone() {
    let (mut doc, a, b, e) = two_vertices(MemoryDrawing::new());
    assert_eq!(doc.handle_notification(Notification::Erased(a)), Reconciled::VertexErased);
    assert!(!doc.selection().contains(&a));

    assert_eq!(doc.handle_notification(Notification::Appended(a)), Reconciled::Revived);
    assert!(!doc.model().vertex_by_handle(a).unwrap().erased);
    assert!(doc.selection().contains(&a));

    assert_eq!(doc.sweep_erased(), 0);
    assert_eq!(doc.model().edge_count(), 1);
    assert_eq!(doc.model().attached_edge_handles(b), vec![e]);
    assert!(doc.store().contains(e));

    // a live vertex appended again is a no-op
    assert_eq!(doc.handle_notification(Notification::Appended(a)), Reconciled::Unchanged);
}

#[test]
fn host_erase_then_sweep_drops_edges() {
    let (mut doc, a, b, e) = two_vertices(subscribed());
    doc.store_mut().erase(a).unwrap();
    doc.pump();
    assert!(doc.model().vertex_by_handle(a).unwrap().erased);
    assert_eq!(doc.model().edge_count(), 1);

    assert_eq!(doc.sweep_erased(), 1);
    assert!(doc.model().vertex_by_handle(a).is_none());
    assert_eq!(doc.model().edge_count(), 0);
    assert!(!doc.store().contains(e));
    assert!(doc.model().attached_edge_handles(b).is_empty());
}

#[test]
fn host_move_redraws_attached_edges() {
    let (mut doc, a, _, e) = two_vertices(subscribed());
    assert!(doc.store_mut().move_entity(a, Point3::xy(0.0, -4.0)));
    doc.pump();
    assert_eq!(doc.model().vertex_by_handle(a).unwrap().position, Point3::xy(0.0, -4.0));
    let (edge, ..) = only_edge(&doc);
    assert_ne!(edge, e);
    assert!(!doc.store().contains(e));
    let pts = doc.store().points(edge).unwrap();
    assert_eq!(pts[0], Point3::xy(0.0, -4.0));
    assert_eq!(pts[1], Point3::xy(5.0, 3.0));
}

#[test]
fn failed_redraw_leaves_move_unapplied() {
    let (mut doc, a, b, e) = two_vertices(MemoryDrawing::new());
    let c = doc.create_vertex(Shape::Circle, Point3::xy(0.0, 10.0), "c").unwrap();
    let f = doc.create_edge(a, c, vec![]).unwrap();
    let entities = doc.store().len();

    // room for one replacement polyline, not two
    doc.store_mut().limit_creates(Some(1));
    assert!(doc.store_mut().move_entity(a, Point3::xy(0.0, -4.0)));
    assert_eq!(doc.handle_notification(Notification::Moved(a)), Reconciled::Skipped);

    assert_eq!(doc.model().vertex_by_handle(a).unwrap().position, Point3::xy(0.0, 0.0));
    assert_eq!(doc.store().len(), entities);
    assert!(doc.store().contains(e) && doc.store().contains(f));
    assert_eq!(doc.model().attached_edge_handles(b), vec![e]);
    assert_eq!(doc.model().attached_edge_handles(c), vec![f]);

    doc.store_mut().limit_creates(None);
    assert_eq!(doc.handle_notification(Notification::Moved(a)), Reconciled::Moved { edges: 2 });
    assert_eq!(doc.model().vertex_by_handle(a).unwrap().position, Point3::xy(0.0, -4.0));
    assert!(!doc.store().contains(e) && !doc.store().contains(f));
    assert_eq!(doc.store().len(), entities);
}

#[test]
fn move_with_missing_entity_keeps_cached_position() {
    let (mut doc, a, ..) = two_vertices(MemoryDrawing::new());
    doc.store_mut().erase(a).unwrap();
    assert_eq!(doc.handle_notification(Notification::Moved(a)), Reconciled::Skipped);
    assert_eq!(doc.model().vertex_by_handle(a).unwrap().position, Point3::xy(0.0, 0.0));
}

#[test]
fn moving_an_edge_is_not_tracked() {
    let (mut doc, _, _, e) = two_vertices(MemoryDrawing::new());
    assert_eq!(doc.handle_notification(Notification::Moved(e)), Reconciled::Ignored);
}

#[test]
fn host_erasing_edge_detaches_it() {
    let (mut doc, a, b, e) = two_vertices(subscribed());
    doc.store_mut().erase(e).unwrap();
    doc.pump();
    assert_eq!(doc.model().edge_count(), 0);
    assert!(doc.model().attached_edge_handles(a).is_empty());
    assert!(doc.model().attached_edge_handles(b).is_empty());
}
