//! Session seeding: the nodes and connections a board starts with.
//!
//! Seeds are JSON documents:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "prompt", "kind": "text", "x": 80, "y": 120 },
//!     { "id": "mind", "kind": "consciousness", "x": 420, "y": 80, "title": "Claude" }
//!   ],
//!   "connections": [ { "from": "prompt.text", "to": "mind.prompt" } ]
//! }
//! ```

use crate::geometry::{Point, Size};
use crate::graph::BoardGraph;
use crate::id::NodeId;
use crate::model::{Endpoint, Node, NodeKind, NodePayload};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSeed {
    #[serde(default)]
    pub nodes: Vec<NodeSeed>,
    #[serde(default)]
    pub connections: Vec<ConnectionSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSeed {
    /// Generated from the kind when omitted.
    #[serde(default)]
    pub id: Option<NodeId>,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    /// Must match `kind` when present.
    #[serde(default)]
    pub payload: Option<NodePayload>,
}

/// `"node.port"` → `"node.port"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSeed {
    pub from: String,
    pub to: String,
}

impl BoardSeed {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid board seed: {e}"))
    }

    /// Materialize the seed into a graph. Any invalid node or connection
    /// fails the whole seed.
    pub fn build(&self) -> Result<BoardGraph, String> {
        let mut graph = BoardGraph::new();
        for seed in &self.nodes {
            graph.add_node(seed.to_node()?)?;
        }
        for conn in &self.connections {
            let from = Endpoint::parse(&conn.from)?;
            let to = Endpoint::parse(&conn.to)?;
            graph.connect(from, to)?;
        }
        log::debug!(
            "seeded board with {} nodes, {} connections",
            graph.len(),
            self.connections.len()
        );
        Ok(graph)
    }
}

impl NodeSeed {
    fn to_node(&self) -> Result<Node, String> {
        let id = self
            .id
            .unwrap_or_else(|| NodeId::with_prefix(self.kind.id_prefix()));
        let mut node = Node::new(id, self.kind, Point::new(self.x, self.y));
        if let Some(title) = &self.title {
            node.title = title.clone();
        }
        if let Some(payload) = &self.payload {
            if payload.kind() != self.kind {
                return Err(format!(
                    "node `{id}` is {} but its payload is {}",
                    self.kind.name(),
                    payload.kind().name()
                ));
            }
            node.payload = payload.clone();
        }
        if self.width.is_some() || self.height.is_some() {
            node.size = Size::new(
                self.width.unwrap_or(node.size.width),
                self.height.unwrap_or(node.size.height),
            );
            node.layout_ports();
        }
        Ok(node)
    }
}

/// The board a fresh session opens with: a prompt wired into a
/// consciousness node.
pub fn default_seed() -> BoardSeed {
    BoardSeed {
        nodes: vec![
            NodeSeed {
                id: Some(NodeId::intern("welcome_prompt")),
                kind: NodeKind::Text,
                x: 80.0,
                y: 160.0,
                title: Some("Prompt".to_string()),
                width: None,
                height: None,
                payload: Some(NodePayload::Text {
                    content: "What does it feel like to think?".to_string(),
                }),
            },
            NodeSeed {
                id: Some(NodeId::intern("welcome_mind")),
                kind: NodeKind::Consciousness,
                x: 420.0,
                y: 80.0,
                title: None,
                width: None,
                height: None,
                payload: None,
            },
        ],
        connections: vec![ConnectionSeed {
            from: "welcome_prompt.text".to_string(),
            to: "welcome_mind.prompt".to_string(),
        }],
    }
}
