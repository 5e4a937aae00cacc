//! Board data model: nodes, ports, and connections.
//!
//! Node behavior is keyed by a closed [`NodeKind`] enum. Per-kind defaults
//! (size, title, ports, payload) live in a static capability table reached
//! through [`NodeKind::spec`].

use crate::consciousness::ChatMessage;
use crate::geometry::{Bounds, Point, Size};
use crate::id::{ConnectionId, NodeId, PortId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Kinds & capability table ────────────────────────────────────────────

/// What a node is. Also names the tool that creates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Input,
    Processor,
    Output,
    Web,
    Text,
    Consciousness,
    DreamJournal,
}

/// Execution status shown on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// Data-type tag carried by a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Object,
    Any,
}

/// Static description of a default port.
#[derive(Debug, Clone, Copy)]
pub struct PortSpec {
    pub name: &'static str,
    pub direction: PortDirection,
    pub data_type: DataType,
}

/// Static per-kind defaults.
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub size: Size,
    pub ports: &'static [PortSpec],
}

const fn port(name: &'static str, direction: PortDirection, data_type: DataType) -> PortSpec {
    PortSpec {
        name,
        direction,
        data_type,
    }
}

use DataType as T;
use PortDirection::{Input as In, Output as Out};

static INPUT: KindSpec = KindSpec {
    name: "input",
    title: "Input",
    description: "Provides a value to the graph",
    size: Size::new(200.0, 100.0),
    ports: &[port("value", Out, T::String)],
};

static PROCESSOR: KindSpec = KindSpec {
    name: "processor",
    title: "Processor",
    description: "Transforms incoming data",
    size: Size::new(220.0, 120.0),
    ports: &[port("input", In, T::Object), port("output", Out, T::Object)],
};

static OUTPUT: KindSpec = KindSpec {
    name: "output",
    title: "Output",
    description: "Displays a result",
    size: Size::new(200.0, 100.0),
    ports: &[port("value", In, T::Any)],
};

static WEB: KindSpec = KindSpec {
    name: "web",
    title: "Web Page",
    description: "Embeds an external page in an isolated frame",
    size: Size::new(480.0, 360.0),
    ports: &[port("url", In, T::String), port("content", Out, T::String)],
};

static TEXT: KindSpec = KindSpec {
    name: "text",
    title: "Text",
    description: "Free-form notes",
    size: Size::new(240.0, 160.0),
    ports: &[port("text", Out, T::String)],
};

static CONSCIOUSNESS: KindSpec = KindSpec {
    name: "consciousness",
    title: "Consciousness",
    description: "Conversation with consciousness-event tracking",
    size: Size::new(360.0, 420.0),
    ports: &[port("prompt", In, T::String), port("events", Out, T::Object)],
};

static DREAM_JOURNAL: KindSpec = KindSpec {
    name: "dream-journal",
    title: "Dream Journal",
    description: "Collects journal entries",
    size: Size::new(300.0, 260.0),
    ports: &[port("entry", In, T::String)],
};

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Input,
        NodeKind::Processor,
        NodeKind::Output,
        NodeKind::Web,
        NodeKind::Text,
        NodeKind::Consciousness,
        NodeKind::DreamJournal,
    ];

    /// The capability table entry for this kind.
    pub fn spec(self) -> &'static KindSpec {
        match self {
            NodeKind::Input => &INPUT,
            NodeKind::Processor => &PROCESSOR,
            NodeKind::Output => &OUTPUT,
            NodeKind::Web => &WEB,
            NodeKind::Text => &TEXT,
            NodeKind::Consciousness => &CONSCIOUSNESS,
            NodeKind::DreamJournal => &DREAM_JOURNAL,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Prefix for generated ids (`dream-journal` → `dream_journal_3`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            NodeKind::DreamJournal => "dream_journal",
            other => other.name(),
        }
    }

    pub fn default_payload(self) -> NodePayload {
        match self {
            NodeKind::Input => NodePayload::Input {
                value: String::new(),
            },
            NodeKind::Processor => NodePayload::Processor {
                operation: "identity".to_string(),
            },
            NodeKind::Output => NodePayload::Output { value: None },
            NodeKind::Web => NodePayload::Web {
                url: "about:blank".to_string(),
            },
            NodeKind::Text => NodePayload::Text {
                content: String::new(),
            },
            NodeKind::Consciousness => NodePayload::Consciousness {
                transcript: Vec::new(),
                level: 0.0,
            },
            NodeKind::DreamJournal => NodePayload::DreamJournal {
                entries: Vec::new(),
            },
        }
    }
}

// ─── Payload ─────────────────────────────────────────────────────────────

/// Kind-specific node content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodePayload {
    Input { value: String },
    Processor { operation: String },
    Output { value: Option<String> },
    Web { url: String },
    Text { content: String },
    Consciousness { transcript: Vec<ChatMessage>, level: f32 },
    DreamJournal { entries: Vec<String> },
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Input { .. } => NodeKind::Input,
            NodePayload::Processor { .. } => NodeKind::Processor,
            NodePayload::Output { .. } => NodeKind::Output,
            NodePayload::Web { .. } => NodeKind::Web,
            NodePayload::Text { .. } => NodeKind::Text,
            NodePayload::Consciousness { .. } => NodeKind::Consciousness,
            NodePayload::DreamJournal { .. } => NodeKind::DreamJournal,
        }
    }
}

// ─── Ports ───────────────────────────────────────────────────────────────

/// A connection endpoint owned by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub direction: PortDirection,
    pub data_type: DataType,
    /// Offset from the owning node's top-left corner.
    pub offset: Point,
    pub connected: bool,
}

/// `node.port` reference used by connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub port: PortId,
}

impl Endpoint {
    pub fn new(node: NodeId, port: PortId) -> Self {
        Self { node, port }
    }

    /// Parse `"node.port"`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (node, port) = s
            .rsplit_once('.')
            .ok_or_else(|| format!("endpoint `{s}` must look like `node.port`"))?;
        if node.is_empty() || port.is_empty() {
            return Err(format!("endpoint `{s}` has an empty node or port name"));
        }
        Ok(Self::new(NodeId::intern(node), NodeId::intern(port)))
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A positioned, sized unit on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub title: String,
    pub description: String,
    /// Top-left corner in canvas space.
    pub position: Point,
    pub size: Size,
    pub payload: NodePayload,
    pub status: NodeStatus,
    pub selected: bool,
    pub ports: SmallVec<[Port; 4]>,
}

impl Node {
    /// Build a node with the kind's default size, ports, and payload.
    pub fn new(id: NodeId, kind: NodeKind, position: Point) -> Self {
        let spec = kind.spec();
        let ports = spec
            .ports
            .iter()
            .map(|p| Port {
                id: NodeId::intern(p.name),
                direction: p.direction,
                data_type: p.data_type,
                offset: Point::ORIGIN,
                connected: false,
            })
            .collect();
        let mut node = Self {
            id,
            kind,
            title: spec.title.to_string(),
            description: spec.description.to_string(),
            position,
            size: spec.size,
            payload: kind.default_payload(),
            status: NodeStatus::Idle,
            selected: false,
            ports,
        };
        node.layout_ports();
        node
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.position, self.size)
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == id)
    }

    pub fn port_mut(&mut self, id: PortId) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.id == id)
    }

    /// Canvas-space position of a port.
    pub fn port_position(&self, id: PortId) -> Option<Point> {
        self.port(id).map(|p| self.position + p.offset)
    }

    /// Place inputs on the left edge and outputs on the right edge,
    /// spaced evenly along the height.
    pub fn layout_ports(&mut self) {
        let count = |dir: PortDirection| self.ports.iter().filter(|p| p.direction == dir).count();
        let (n_in, n_out) = (count(PortDirection::Input), count(PortDirection::Output));
        let (mut i_in, mut i_out) = (0usize, 0usize);
        let Size { width, height } = self.size;
        for port in &mut self.ports {
            let (x, slot, total) = match port.direction {
                PortDirection::Input => {
                    i_in += 1;
                    (0.0, i_in, n_in)
                }
                PortDirection::Output => {
                    i_out += 1;
                    (width, i_out, n_out)
                }
            };
            let y = height * slot as f32 / (total + 1) as f32;
            port.offset = Point::new(x, y);
        }
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// An edge from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: Endpoint,
    pub destination: Endpoint,
    /// SVG path data of the rendered curve, in canvas space.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_kind_roundtrips_by_name() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.default_payload().kind(), kind);
        }
        assert_eq!(NodeKind::from_name("hologram"), None);
    }

    #[test]
    fn kind_serializes_kebab_case() {
        let json = serde_json::to_string(&NodeKind::DreamJournal).unwrap();
        assert_eq!(json, r#""dream-journal""#);
        assert_eq!(NodeKind::DreamJournal.id_prefix(), "dream_journal");
    }

    #[test]
    fn new_node_uses_kind_defaults() {
        let node = Node::new(NodeId::intern("p1"), NodeKind::Processor, Point::new(5.0, 5.0));
        assert_eq!(node.size, Size::new(220.0, 120.0));
        assert_eq!(node.title, "Processor");
        assert_eq!(node.status, NodeStatus::Idle);
        assert_eq!(node.ports.len(), 2);
        assert!(!node.selected);
    }

    #[test]
    fn ports_sit_on_node_edges() {
        let node = Node::new(NodeId::intern("p2"), NodeKind::Processor, Point::new(100.0, 50.0));
        let input = node.port(NodeId::intern("input")).unwrap();
        let output = node.port(NodeId::intern("output")).unwrap();
        assert_eq!(input.offset, Point::new(0.0, 60.0));
        assert_eq!(output.offset, Point::new(220.0, 60.0));
        assert_eq!(
            node.port_position(NodeId::intern("output")),
            Some(Point::new(320.0, 110.0))
        );
    }

    #[test]
    fn endpoint_parse() {
        let e = Endpoint::parse("prompt_box.text").unwrap();
        assert_eq!(e.node.as_str(), "prompt_box");
        assert_eq!(e.port.as_str(), "text");
        assert!(Endpoint::parse("nodot").is_err());
        assert!(Endpoint::parse("node.").is_err());
    }

    #[test]
    fn payload_is_tagged_by_kind() {
        let json = serde_json::to_string(&NodePayload::Web {
            url: "https://example.com".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"web","url":"https://example.com"}"#);
    }
}
