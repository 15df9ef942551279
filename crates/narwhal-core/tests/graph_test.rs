use narwhal_core::geom::{point, rect};
use narwhal_core::{Edge, Error, Graph, Item, Node, RankDir};

fn diamond() -> Graph {
    let mut g = Graph::new();
    g.add_node(Node::new("a", 100.0, 40.0).at(0.0, 0.0)).unwrap();
    g.add_node(Node::new("b", 100.0, 40.0).at(-100.0, 100.0))
        .unwrap();
    g.add_node(Node::new("c", 100.0, 40.0).at(100.0, 100.0)).unwrap();
    g.add_node(Node::new("d", 100.0, 40.0).at(0.0, 200.0)).unwrap();
    g.add_edge(Edge::new("ab", "a", "b")).unwrap();
    g.add_edge(Edge::new("ac", "a", "c")).unwrap();
    g.add_edge(Edge::new("bd", "b", "d")).unwrap();
    g.add_edge(Edge::new("cd", "c", "d")).unwrap();
    g
}

#[test]
fn graph_rejects_duplicate_nodes_and_dangling_edges() {
    let mut g = diamond();
    assert!(matches!(
        g.add_node(Node::new("a", 1.0, 1.0)),
        Err(Error::DuplicateNode { node_id }) if node_id == "a"
    ));
    assert!(matches!(
        g.add_edge(Edge::new("ax", "a", "x")),
        Err(Error::MissingEndpoint { node_id, .. }) if node_id == "x"
    ));
    assert!(matches!(
        g.add_edge(Edge::new("ab", "b", "d")),
        Err(Error::DuplicateEdge { .. })
    ));
    // Same endpoints under a different id.
    assert!(matches!(
        g.add_edge(Edge::new("ab2", "a", "b")),
        Err(Error::DuplicateEdge { edge_id }) if edge_id == "ab"
    ));
    assert_eq!(g.edge_count(), 4);
}

#[test]
fn graph_remove_node_drops_incident_edges_and_selection() {
    let mut g = diamond();
    g.select(Item::Edge("ab".to_string())).unwrap();
    g.toggle_selection(Item::Node("b".to_string())).unwrap();
    g.toggle_selection(Item::Node("c".to_string())).unwrap();
    g.focus(Some(Item::Node("b".to_string()))).unwrap();

    let removed = g.remove_node("b").unwrap();
    assert_eq!(removed.id, "b");
    assert_eq!(g.node_count(), 3);
    let remaining: Vec<&str> = g.edges().map(|e| e.id.as_str()).collect();
    assert_eq!(remaining, ["ac", "cd"]);

    let selected: Vec<&Item> = g.selection().collect();
    assert_eq!(selected, [&Item::Node("c".to_string())]);
    assert_eq!(g.focused(), None);

    assert!(matches!(g.remove_node("b"), Err(Error::UnknownNode { .. })));
}

#[test]
fn graph_toggle_selection_round_trips() {
    let mut g = diamond();
    let item = Item::Node("a".to_string());
    assert!(g.toggle_selection(item.clone()).unwrap());
    assert!(g.is_selected(&item));
    assert!(!g.toggle_selection(item.clone()).unwrap());
    assert!(!g.is_selected(&item));
    assert!(matches!(
        g.toggle_selection(Item::Edge("zz".to_string())),
        Err(Error::UnknownEdge { .. })
    ));
}

#[test]
fn graph_delete_selection_counts_cascaded_edges() {
    let mut g = diamond();
    g.select(Item::Node("a".to_string())).unwrap();
    g.toggle_selection(Item::Edge("ab".to_string())).unwrap();
    // Node `a` plus its two edges; `ab` is one of them.
    assert_eq!(g.delete_selection(), 3);
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.selection().count(), 0);
}

#[test]
fn graph_bounding_box_covers_nodes_and_waypoints() {
    let mut g = diamond();
    assert_eq!(g.bounding_box(), Some(rect(-150.0, -20.0, 150.0, 220.0)));

    g.edge_mut("ab").unwrap().points = vec![point(-400.0, 50.0)];
    assert_eq!(g.bounding_box(), Some(rect(-400.0, -20.0, 150.0, 220.0)));

    assert_eq!(Graph::new().bounding_box(), None);
}

#[test]
fn graph_pin_connectors_rewrites_endpoints_only() {
    let mut g = diamond();
    g.edge_mut("ab").unwrap().points = vec![
        point(999.0, 999.0),
        point(-50.0, 50.0),
        point(999.0, 999.0),
    ];
    g.add_node(Node::new("floating", 10.0, 10.0)).unwrap();
    g.add_edge(Edge::new("af", "a", "floating")).unwrap();

    assert_eq!(g.pin_connectors(RankDir::TB), 4);

    let ab = &g.edge("ab").unwrap().points;
    assert_eq!(ab, &[point(0.0, 20.0), point(-50.0, 50.0), point(-100.0, 80.0)]);

    let ac = &g.edge("ac").unwrap().points;
    assert_eq!(ac, &[point(0.0, 20.0), point(100.0, 80.0)]);

    assert!(g.edge("af").unwrap().points.is_empty());
}

#[test]
fn graph_move_node_updates_center() {
    let mut g = diamond();
    g.move_node("d", point(10.0, 300.0)).unwrap();
    assert_eq!(g.node("d").unwrap().center(), Some(point(10.0, 300.0)));
    assert!(g.move_node("nope", point(0.0, 0.0)).is_err());
}

#[test]
fn graph_document_json_round_trip_keeps_order() {
    let text = r#"{
        "nodes": [
            {"id": "z", "width": 10, "height": 10, "x": 0, "y": 0},
            {"id": "a", "width": 10, "height": 10}
        ],
        "edges": [{"id": "za", "src": "z", "dest": "a", "points": [[0, 5], [0, 20]]}]
    }"#;
    let g = Graph::from_json_str(text).unwrap();
    let ids: Vec<&str> = g.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["z", "a"]);
    assert_eq!(g.node("a").unwrap().center(), None);
    assert_eq!(g.edge("za").unwrap().points.len(), 2);

    let doc = g.to_document();
    let again = Graph::from_document(doc).unwrap();
    assert_eq!(again.edge("za"), g.edge("za"));
}
