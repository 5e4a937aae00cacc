//! The board graph: nodes as graph vertices, connections as edges.
//!
//! Removing a node removes every incident connection, so a deleted node
//! can never leave a dangling edge behind. Port `connected` flags are
//! recomputed whenever an edge appears or disappears.

use crate::curve::connection_path;
use crate::geometry::{Point, Size};
use crate::id::{ConnectionId, NodeId};
use crate::model::{Connection, Endpoint, Node, PortDirection};
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct BoardGraph {
    /// Edges point from the source node to the destination node.
    pub graph: StableDiGraph<Node, Connection>,

    /// Index from NodeId → NodeIndex for fast lookup.
    id_index: HashMap<NodeId, NodeIndex>,

    /// Paint order, back to front. `StableGraph` reuses vacated slots, so
    /// index order alone does not reflect insertion order.
    order: Vec<NodeIndex>,
}

impl BoardGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Insert a node on top of the paint order. Ids must be unique.
    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex, String> {
        if self.contains(node.id) {
            return Err(format!("node `{}` already exists", node.id));
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        self.order.push(idx);
        Ok(idx)
    }

    /// Remove a node together with every connection touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.id_index.remove(&id)?;
        let survivors: Vec<Endpoint> = self
            .incident_edges(idx)
            .into_iter()
            .map(|e| {
                let conn = &self.graph[e];
                if conn.source.node == id {
                    conn.destination
                } else {
                    conn.source
                }
            })
            .collect();
        self.order.retain(|&i| i != idx);
        let removed = self.graph.remove_node(idx);
        for endpoint in survivors {
            self.refresh_port_flag(endpoint);
        }
        log::debug!("removed node {id}");
        removed
    }

    fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index_of(id).map(|idx| &mut self.graph[idx])
    }

    /// Nodes back to front.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.order.iter().map(|&idx| &self.graph[idx])
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id).collect()
    }

    // ─── Geometry edits ──────────────────────────────────────────────────

    /// Translate a node by a canvas-space delta and re-route its curves.
    pub fn move_node(&mut self, id: NodeId, delta: Point) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.graph[idx].position += delta;
        self.refresh_curves(idx);
        true
    }

    /// Resize a node, re-lay its ports, and re-route its curves.
    pub fn resize_node(&mut self, id: NodeId, size: Size) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let node = &mut self.graph[idx];
        node.size = size;
        node.layout_ports();
        self.refresh_curves(idx);
        true
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Connect an output port to an input port on another node.
    pub fn connect(&mut self, source: Endpoint, destination: Endpoint) -> Result<ConnectionId, String> {
        if source.node == destination.node {
            return Err(format!("cannot connect node `{}` to itself", source.node));
        }
        let (src_idx, from) = self.resolve_port(source, PortDirection::Output)?;
        let (dst_idx, to) = self.resolve_port(destination, PortDirection::Input)?;
        if self
            .connections()
            .any(|c| c.source == source && c.destination == destination)
        {
            return Err(format!(
                "`{}.{}` is already connected to `{}.{}`",
                source.node, source.port, destination.node, destination.port
            ));
        }

        let id = NodeId::with_prefix("conn");
        self.graph.add_edge(
            src_idx,
            dst_idx,
            Connection {
                id,
                source,
                destination,
                path: connection_path(from, to),
            },
        );
        self.refresh_port_flag(source);
        self.refresh_port_flag(destination);
        log::debug!("connected {}.{} -> {}.{}", source.node, source.port, destination.node, destination.port);
        Ok(id)
    }

    /// Remove a connection by id. Unknown ids are ignored.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let Some(edge) = self.edge_by_id(id) else {
            return false;
        };
        let Some(conn) = self.graph.remove_edge(edge) else {
            return false;
        };
        self.refresh_port_flag(conn.source);
        self.refresh_port_flag(conn.destination);
        true
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.edge_weights()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections().find(|c| c.id == id)
    }

    /// Connections whose source or destination is `id`.
    pub fn connections_of(&self, id: NodeId) -> Vec<&Connection> {
        match self.index_of(id) {
            Some(idx) => self
                .incident_edges(idx)
                .into_iter()
                .map(|e| &self.graph[e])
                .collect(),
            None => Vec::new(),
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn edge_by_id(&self, id: ConnectionId) -> Option<EdgeIndex> {
        self.graph
            .edge_indices()
            .find(|&e| self.graph[e].id == id)
    }

    fn incident_edges(&self, idx: NodeIndex) -> Vec<EdgeIndex> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect()
    }

    fn resolve_port(&self, endpoint: Endpoint, want: PortDirection) -> Result<(NodeIndex, Point), String> {
        let idx = self
            .index_of(endpoint.node)
            .ok_or_else(|| format!("unknown node `{}`", endpoint.node))?;
        let node = &self.graph[idx];
        let port = node
            .port(endpoint.port)
            .ok_or_else(|| format!("node `{}` has no port `{}`", endpoint.node, endpoint.port))?;
        if port.direction != want {
            return Err(format!(
                "port `{}.{}` is {:?}, expected {:?}",
                endpoint.node, endpoint.port, port.direction, want
            ));
        }
        Ok((idx, node.position + port.offset))
    }

    fn refresh_port_flag(&mut self, endpoint: Endpoint) {
        let connected = self
            .connections()
            .any(|c| c.source == endpoint || c.destination == endpoint);
        if let Some(port) = self
            .get_mut(endpoint.node)
            .and_then(|n| n.port_mut(endpoint.port))
        {
            port.connected = connected;
        }
    }

    fn refresh_curves(&mut self, idx: NodeIndex) {
        for edge in self.incident_edges(idx) {
            let conn = &self.graph[edge];
            let from = self
                .get(conn.source.node)
                .and_then(|n| n.port_position(conn.source.port));
            let to = self
                .get(conn.destination.node)
                .and_then(|n| n.port_position(conn.destination.port));
            if let (Some(from), Some(to)) = (from, to) {
                self.graph[edge].path = connection_path(from, to);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use pretty_assertions::assert_eq;

    fn board() -> (BoardGraph, NodeId, NodeId) {
        let mut g = BoardGraph::new();
        let a = NodeId::intern("g_text");
        let b = NodeId::intern("g_mind");
        g.add_node(Node::new(a, NodeKind::Text, Point::new(0.0, 0.0))).unwrap();
        g.add_node(Node::new(b, NodeKind::Consciousness, Point::new(400.0, 0.0)))
            .unwrap();
        (g, a, b)
    }

    fn wire(a: NodeId, b: NodeId) -> (Endpoint, Endpoint) {
        (
            Endpoint::new(a, NodeId::intern("text")),
            Endpoint::new(b, NodeId::intern("prompt")),
        )
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let (mut g, a, _) = board();
        let err = g.add_node(Node::new(a, NodeKind::Web, Point::ORIGIN)).unwrap_err();
        assert!(err.contains("already exists"));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn connect_marks_ports() {
        let (mut g, a, b) = board();
        let (src, dst) = wire(a, b);
        let id = g.connect(src, dst).unwrap();
        assert!(g.get(a).unwrap().port(src.port).unwrap().connected);
        assert!(g.get(b).unwrap().port(dst.port).unwrap().connected);
        assert!(g.connection(id).unwrap().path.starts_with('M'));
    }

    #[test]
    fn connect_validates_direction_and_duplicates() {
        let (mut g, a, b) = board();
        let (src, dst) = wire(a, b);
        assert!(g.connect(dst, src).is_err());
        assert!(g.connect(src, Endpoint::new(b, NodeId::intern("nope"))).is_err());
        assert!(g.connect(src, Endpoint::new(a, NodeId::intern("text"))).is_err());
        g.connect(src, dst).unwrap();
        assert!(g.connect(src, dst).is_err());
    }

    #[test]
    fn removing_node_sweeps_connections() {
        let (mut g, a, b) = board();
        let (src, dst) = wire(a, b);
        g.connect(src, dst).unwrap();

        let removed = g.remove_node(b).unwrap();
        assert_eq!(removed.id, b);
        assert_eq!(g.connections().count(), 0);
        assert!(!g.get(a).unwrap().port(src.port).unwrap().connected);
        assert!(g.remove_node(b).is_none());
    }

    #[test]
    fn disconnect_clears_flags() {
        let (mut g, a, b) = board();
        let (src, dst) = wire(a, b);
        let id = g.connect(src, dst).unwrap();
        assert!(g.disconnect(id));
        assert!(!g.disconnect(id));
        assert!(!g.get(b).unwrap().port(dst.port).unwrap().connected);
    }

    #[test]
    fn moving_node_reroutes_curve() {
        let (mut g, a, b) = board();
        let (src, dst) = wire(a, b);
        let id = g.connect(src, dst).unwrap();
        let before = g.connection(id).unwrap().path.clone();
        assert!(g.move_node(a, Point::new(0.0, 50.0)));
        assert_ne!(g.connection(id).unwrap().path, before);
    }

    #[test]
    fn paint_order_follows_insertion_after_reuse() {
        let (mut g, a, b) = board();
        g.remove_node(a);
        let c = NodeId::intern("g_late");
        g.add_node(Node::new(c, NodeKind::Input, Point::ORIGIN)).unwrap();
        assert_eq!(g.node_ids(), vec![b, c]);
    }
}
