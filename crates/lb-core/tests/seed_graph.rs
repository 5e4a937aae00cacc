//! Integration tests: seed JSON → board graph → edits.
//!
//! Exercises the full `lb-core` pipeline: seed document → nodes, ports and
//! connections, then moves and removals against the built graph.

use lb_core::curve::connection_path;
use lb_core::model::{Endpoint, NodeKind, NodePayload, PortDirection};
use lb_core::{BoardGraph, BoardSeed, CanvasConfig, NodeId, Point, Size};
use pretty_assertions::assert_eq;

fn build() -> BoardGraph {
    let seed = BoardSeed::from_json(include_str!("fixtures/pipeline.json")).unwrap();
    seed.build().unwrap()
}

fn ep(s: &str) -> Endpoint {
    Endpoint::parse(s).unwrap()
}

fn port_connected(graph: &BoardGraph, endpoint: &str) -> bool {
    let e = ep(endpoint);
    graph.get(e.node).unwrap().port(e.port).unwrap().connected
}

// ─── Seeding ─────────────────────────────────────────────────────────────

#[test]
fn seed_builds_nodes_and_connections() {
    let graph = build();
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.connections().count(), 3);
    assert_eq!(
        graph.node_ids(),
        ["question", "upper", "answer", "docs"].map(NodeId::intern).to_vec()
    );

    let upper = graph.get(NodeId::intern("upper")).unwrap();
    assert_eq!(
        upper.payload,
        NodePayload::Processor {
            operation: "uppercase".into()
        }
    );
    assert_eq!(graph.get(NodeId::intern("answer")).unwrap().title, "Answer");
    assert!(port_connected(&graph, "question.value"));
    assert!(port_connected(&graph, "answer.value"));
    assert!(!port_connected(&graph, "docs.url"));
}

#[test]
fn seed_size_relays_ports() {
    let graph = build();
    let docs = graph.get(NodeId::intern("docs")).unwrap();
    assert_eq!(docs.size, Size::new(640.0, 400.0));

    let content = docs.port(NodeId::intern("content")).unwrap();
    assert_eq!(content.direction, PortDirection::Output);
    assert_eq!(content.offset, Point::new(640.0, 200.0));
}

#[test]
fn mismatched_payload_fails_seed() {
    let json = r#"{"nodes":[{"id":"n","kind":"text","x":0,"y":0,
        "payload":{"kind":"web","url":"https://example.org"}}]}"#;
    let err = BoardSeed::from_json(json).unwrap().build().unwrap_err();
    assert_eq!(err, "node `n` is text but its payload is web");
}

#[test]
fn malformed_seed_is_rejected() {
    let err = BoardSeed::from_json(r#"{"nodes":[{"kind":"sprite","x":0,"y":0}]}"#).unwrap_err();
    assert!(err.starts_with("invalid board seed"), "{err}");
}

// ─── Connections ─────────────────────────────────────────────────────────

#[test]
fn connect_validates_direction_and_duplicates() {
    let mut graph = build();

    let err = graph.connect(ep("upper.input"), ep("answer.value")).unwrap_err();
    assert!(err.contains("expected Output"), "{err}");

    let err = graph.connect(ep("question.value"), ep("upper.input")).unwrap_err();
    assert!(err.contains("already connected"), "{err}");

    let err = graph.connect(ep("upper.output"), ep("upper.input")).unwrap_err();
    assert!(err.contains("itself"), "{err}");

    let err = graph.connect(ep("ghost.out"), ep("answer.value")).unwrap_err();
    assert_eq!(err, "unknown node `ghost`");

    assert_eq!(graph.connections().count(), 3);
}

#[test]
fn curves_follow_moved_nodes() {
    let mut graph = build();
    let upper = NodeId::intern("upper");
    graph.move_node(upper, Point::new(40.0, 100.0));

    for conn in graph.connections_of(upper) {
        let from = graph
            .get(conn.source.node)
            .and_then(|n| n.port_position(conn.source.port))
            .unwrap();
        let to = graph
            .get(conn.destination.node)
            .and_then(|n| n.port_position(conn.destination.port))
            .unwrap();
        assert_eq!(conn.path, connection_path(from, to));
    }
}

#[test]
fn removing_node_sweeps_its_connections() {
    let mut graph = build();
    let removed = graph.remove_node(NodeId::intern("upper")).unwrap();
    assert_eq!(removed.kind, NodeKind::Processor);

    assert_eq!(graph.connections().count(), 1);
    assert!(graph.connections_of(NodeId::intern("upper")).is_empty());
    assert!(!port_connected(&graph, "question.value"));
    // Still fed by the web page.
    assert!(port_connected(&graph, "answer.value"));

    assert!(graph.remove_node(NodeId::intern("upper")).is_none());
}

#[test]
fn disconnect_clears_port_flags() {
    let mut graph = build();
    let id = graph
        .connections()
        .find(|c| c.source == ep("docs.content"))
        .map(|c| c.id)
        .unwrap();
    assert!(graph.disconnect(id));
    assert!(!graph.disconnect(id));
    assert!(!port_connected(&graph, "docs.content"));
    assert!(port_connected(&graph, "answer.value"));
}

// ─── Config ──────────────────────────────────────────────────────────────

#[test]
fn partial_config_fills_defaults() {
    let config = CanvasConfig::from_json(include_str!("fixtures/config.json")).unwrap();
    assert_eq!(config.max_zoom, 4.0);
    assert!(config.scoped_delete);
    assert_eq!(config.min_zoom, 0.25);
    assert_eq!(config.clamp_zoom(10.0), 4.0);

    let err = CanvasConfig::from_json(r#"{"zoom_step": 0.9}"#).unwrap_err();
    assert!(err.contains("zoom_step"), "{err}");
}
