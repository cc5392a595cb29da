use serde_json::json;
use tierline::{
    Anchor, Direction, Edge, Error, ErrorKind, LayoutAdapter, LayoutConfig, Node, Point,
    SchemaDocument, compute_layout,
};

fn chain() -> (Vec<Node>, Vec<Edge>) {
    let nodes = vec![
        Node::new("n1").with_data(json!({ "label": "Client" })),
        Node::new("n2").with_data(json!({ "label": "API" })),
        Node::new("n3").with_data(json!({ "label": "Database" })),
    ];
    let edges = vec![Edge::new("e1", "n1", "n2"), Edge::new("e2", "n2", "n3")];
    (nodes, edges)
}

fn positions(nodes: &[Node]) -> Vec<Point> {
    nodes.iter().map(|n| n.position).collect()
}

#[test]
fn top_to_bottom_chain_stacks_vertically() {
    let (nodes, edges) = chain();
    let out = compute_layout(&nodes, &edges, Direction::TB).unwrap();

    assert_eq!(
        positions(&out.nodes),
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 160.0),
            Point::new(0.0, 320.0)
        ]
    );
    for node in &out.nodes {
        assert_eq!(node.target_position, Some(Anchor::Top));
        assert_eq!(node.source_position, Some(Anchor::Bottom));
    }
    assert_eq!(out.edges, edges);
    assert_eq!(out.nodes[1].label(), Some("API"));
}

#[test]
fn left_to_right_swaps_the_axes() {
    let (nodes, edges) = chain();
    let out = compute_layout(&nodes, &edges, Direction::LR).unwrap();

    assert_eq!(
        positions(&out.nodes),
        vec![
            Point::new(0.0, 0.0),
            Point::new(260.0, 0.0),
            Point::new(520.0, 0.0)
        ]
    );
    assert_eq!(out.nodes[0].target_position, Some(Anchor::Left));
    assert_eq!(out.nodes[0].source_position, Some(Anchor::Right));
}

#[test]
fn reversed_directions_flip_the_rank_axis() {
    let (nodes, edges) = chain();

    let bt = compute_layout(&nodes, &edges, Direction::BT).unwrap();
    assert!(bt.nodes[0].position.y > bt.nodes[1].position.y);
    assert!(bt.nodes[1].position.y > bt.nodes[2].position.y);

    let rl = compute_layout(&nodes, &edges, Direction::RL).unwrap();
    assert!(rl.nodes[0].position.x > rl.nodes[1].position.x);
    assert!(rl.nodes[1].position.x > rl.nodes[2].position.x);
}

#[test]
fn empty_diagram_lays_out_to_nothing() {
    let out = compute_layout(&[], &[], Direction::TB).unwrap();
    assert!(out.nodes.is_empty());
    assert!(out.edges.is_empty());
}

#[test]
fn dangling_edge_fails_the_whole_layout() {
    let nodes = vec![Node::new("n1")];
    let edges = vec![Edge::new("e1", "n1", "missing")];
    let err = compute_layout(&nodes, &edges, Direction::TB).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(matches!(
        err,
        Error::DanglingEdgeReference { ref node_id, .. } if node_id == "missing"
    ));
}

#[test]
fn unconnected_nodes_get_distinct_positions() {
    let nodes = vec![Node::new("a"), Node::new("b"), Node::new("c")];
    let out = compute_layout(&nodes, &[], Direction::TB).unwrap();
    let ps = positions(&out.nodes);
    for (i, p) in ps.iter().enumerate() {
        for q in &ps[i + 1..] {
            assert!(p != q, "{p:?} collides with {q:?}");
            assert!((p.x - q.x).abs() >= 180.0 || (p.y - q.y).abs() >= 80.0);
        }
    }
}

#[test]
fn same_input_gives_same_layout() {
    let nodes: Vec<Node> = (0..12).map(|i| Node::new(format!("n{i}"))).collect();
    let edges: Vec<Edge> = (0..11)
        .flat_map(|i| {
            let mut out = vec![Edge::new(format!("a{i}"), format!("n{i}"), format!("n{}", i + 1))];
            if i + 3 < 12 {
                out.push(Edge::new(
                    format!("b{i}"),
                    format!("n{i}"),
                    format!("n{}", i + 3),
                ));
            }
            out
        })
        .collect();

    let first = compute_layout(&nodes, &edges, Direction::LR).unwrap();
    let second = compute_layout(&nodes, &edges, Direction::LR).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cycles_still_lay_out() {
    let nodes = vec![Node::new("a"), Node::new("b"), Node::new("c")];
    let edges = vec![
        Edge::new("e1", "a", "b"),
        Edge::new("e2", "b", "c"),
        Edge::new("e3", "c", "a"),
    ];
    let out = compute_layout(&nodes, &edges, Direction::TB).unwrap();
    assert_eq!(out.nodes.len(), 3);
    assert!(out.nodes[0].position.y < out.nodes[1].position.y);
    assert!(out.nodes[1].position.y < out.nodes[2].position.y);
}

#[test]
fn custom_spacing_changes_rank_distance() {
    let (nodes, edges) = chain();
    let adapter = LayoutAdapter::new().with_config(
        LayoutConfig::default()
            .node_size(100.0, 40.0)
            .rank_sep(20.0),
    );
    let out = adapter.compute(&nodes, &edges, Direction::TB).unwrap();
    assert_eq!(out.nodes[1].position.y - out.nodes[0].position.y, 60.0);
}

#[test]
fn schema_document_lays_out_as_a_graph() {
    let doc = SchemaDocument::from_json(
        r#"{
            "tables": [
                { "name": "users", "columns": [{ "name": "id", "type": "integer", "primary_key": true }] },
                { "name": "orders", "columns": [
                    { "name": "id", "type": "integer", "primary_key": true },
                    { "name": "user_id", "type": "integer", "foreign_key": "users.id" }
                ] }
            ],
            "relationships": [{ "from": "orders.user_id", "to": "users.id", "type": "many-to-one" }]
        }"#,
    )
    .unwrap();
    let (nodes, edges) = doc.to_graph().unwrap();
    let out = compute_layout(&nodes, &edges, Direction::TB).unwrap();
    // orders references users, so it ranks first.
    assert!(out.nodes[1].position.y < out.nodes[0].position.y);
}
