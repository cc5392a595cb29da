use tierline_graphlib::{EdgeKey, Graph};

#[test]
fn set_edge_creates_missing_endpoints_in_insertion_order() {
    let mut g: Graph<i32, (), ()> = Graph::new();
    g.set_node("z", 1);
    g.set_edge("a", "z");

    assert_eq!(g.node_ids(), vec!["z".to_string(), "a".to_string()]);
    assert_eq!(g.node("z"), Some(&1));
    assert_eq!(g.node("a"), Some(&0));
}

#[test]
fn set_edge_keeps_existing_label_but_set_edge_with_label_replaces_it() {
    let mut g: Graph<(), i32, ()> = Graph::new();
    g.set_edge_with_label("a", "b", 3);
    g.set_edge("a", "b");
    assert_eq!(g.edge("a", "b"), Some(&3));

    g.set_edge_with_label("a", "b", 7);
    assert_eq!(g.edge("a", "b"), Some(&7));
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn edges_are_directed() {
    let mut g: Graph<(), (), ()> = Graph::new();
    g.set_edge("a", "b");

    assert!(g.has_edge("a", "b"));
    assert!(!g.has_edge("b", "a"));
    assert_eq!(g.out_edges("a"), vec![EdgeKey::new("a", "b")]);
    assert_eq!(g.in_edges("a"), Vec::<EdgeKey>::new());
}

#[test]
fn sources_and_sinks_follow_insertion_order() {
    let mut g: Graph<(), (), ()> = Graph::new();
    g.set_node("lonely", ());
    g.set_edge("b", "c");
    g.set_edge("a", "c");

    assert_eq!(g.sources(), vec!["lonely", "b", "a"]);
    assert_eq!(g.sinks(), vec!["lonely", "c"]);
}

#[test]
fn queries_on_missing_nodes_are_empty() {
    let g: Graph<(), (), ()> = Graph::new();
    assert!(g.successors("nope").is_empty());
    assert!(g.predecessors("nope").is_empty());
    assert!(g.out_edges("nope").is_empty());
    assert!(g.node("nope").is_none());
}

#[test]
fn self_loops_are_reported_as_such() {
    let mut g: Graph<(), (), ()> = Graph::new();
    g.set_edge("a", "a");
    let keys = g.edge_keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].is_self_loop());
    assert_eq!(g.successors("a"), vec!["a"]);
}
