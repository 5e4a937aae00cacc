//! Hit testing: canvas point → node or port lookup.
//!
//! Walks the paint order back to front reversed (topmost first).
//! All coordinates are canvas space; convert pointer positions with
//! `ViewTransform::screen_to_canvas` first.

use lb_core::model::{Endpoint, PortDirection};
use lb_core::{BoardGraph, Bounds, NodeId, Point};

/// Topmost node whose bounds contain `p`.
pub fn hit_test(graph: &BoardGraph, p: Point) -> Option<NodeId> {
    graph
        .nodes()
        .rev()
        .find(|node| node.bounds().contains(p))
        .map(|node| node.id)
}

/// A port under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortHit {
    pub endpoint: Endpoint,
    pub direction: PortDirection,
    /// Canvas-space position of the port centre.
    pub position: Point,
}

/// Topmost port within `radius` of `p`. Ports win over node bodies, so
/// callers should test ports first.
pub fn hit_test_port(graph: &BoardGraph, p: Point, radius: f32) -> Option<PortHit> {
    for node in graph.nodes().rev() {
        for port in &node.ports {
            let position = node.position + port.offset;
            if position.distance(p) <= radius {
                return Some(PortHit {
                    endpoint: Endpoint::new(node.id, port.id),
                    direction: port.direction,
                    position,
                });
            }
        }
        // A node body covers any port of nodes beneath it.
        if node.bounds().contains(p) {
            return None;
        }
    }
    None
}

/// All nodes intersecting `rect`, back to front.
pub fn hit_test_rect(graph: &BoardGraph, rect: Bounds) -> Vec<NodeId> {
    graph
        .nodes()
        .filter(|node| node.bounds().intersects(&rect))
        .map(|node| node.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lb_core::model::{Node, NodeKind};
    use lb_core::Size;
    use pretty_assertions::assert_eq;

    fn overlapping() -> (BoardGraph, NodeId, NodeId) {
        let mut g = BoardGraph::new();
        let below = NodeId::intern("hit_below");
        let above = NodeId::intern("hit_above");
        g.add_node(Node::new(below, NodeKind::Text, Point::new(0.0, 0.0)))
            .unwrap();
        g.add_node(Node::new(above, NodeKind::Input, Point::new(100.0, 100.0)))
            .unwrap();
        (g, below, above)
    }

    #[test]
    fn topmost_node_wins() {
        let (g, below, above) = overlapping();
        assert_eq!(hit_test(&g, Point::new(150.0, 120.0)), Some(above));
        assert_eq!(hit_test(&g, Point::new(10.0, 10.0)), Some(below));
        assert_eq!(hit_test(&g, Point::new(900.0, 900.0)), None);
    }

    #[test]
    fn port_hit_within_radius() {
        let (g, _, above) = overlapping();
        // Input node: 200×100, one output port at (width, height / 2).
        let hit = hit_test_port(&g, Point::new(303.0, 150.0), 8.0).unwrap();
        assert_eq!(hit.endpoint, Endpoint::new(above, NodeId::intern("value")));
        assert_eq!(hit.direction, PortDirection::Output);
        assert_eq!(hit_test_port(&g, Point::new(320.0, 150.0), 8.0), None);
    }

    #[test]
    fn covered_port_is_not_hit() {
        let (g, below, _) = overlapping();
        // Text node output port sits at (240, 80), outside the input node.
        assert!(hit_test_port(&g, Point::new(240.0, 80.0), 4.0).is_some());
        let covered = Bounds::from_origin_size(Point::new(100.0, 100.0), Size::new(200.0, 100.0));
        assert!(covered.contains(Point::new(240.0, 100.0)));
        let mut moved = g.clone();
        moved.move_node(below, Point::new(0.0, 20.0));
        // Port now at (240, 100), under the input node's body.
        assert_eq!(hit_test_port(&moved, Point::new(240.0, 100.0), 4.0), None);
    }

    #[test]
    fn rect_collects_intersections() {
        let (g, below, above) = overlapping();
        let all = hit_test_rect(&g, Bounds::from_corners(Point::new(50.0, 50.0), Point::new(150.0, 150.0)));
        assert_eq!(all, vec![below, above]);
        let none = hit_test_rect(&g, Bounds::from_corners(Point::new(500.0, 500.0), Point::new(600.0, 600.0)));
        assert!(none.is_empty());
    }
}
