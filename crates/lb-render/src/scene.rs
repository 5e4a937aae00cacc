//! Board state → renderable scene.
//!
//! `project` is a pure function of the graph and view transform. Hosts
//! draw node chrome from `NodeVisual` and hand each `ContentSlot` to the
//! presentation logic for that kind.

use lb_core::consciousness::ChatRole;
use lb_core::curve::connection_path;
use lb_core::model::{DataType, Node, NodeKind, NodePayload, NodeStatus, PortDirection};
use lb_core::{BoardGraph, Bounds, ConnectionId, NodeId, Point, PortId, ViewTransform};
use serde::Serialize;

/// Frame sandbox applied to embedded web pages.
pub const WEB_FRAME_SANDBOX: &str = "allow-scripts allow-same-origin";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Canvas → screen affine as `[a, b, c, d, e, f]`.
    pub transform: [f64; 6],
    pub zoom: f32,
    pub pan: Point,
    /// Back to front.
    pub nodes: Vec<NodeVisual>,
    pub connections: Vec<ConnectionVisual>,
    /// Preview wire while a connection drag is in progress.
    pub pending_wire: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisual {
    pub id: NodeId,
    pub kind: NodeKind,
    pub title: String,
    pub status: NodeStatus,
    pub selected: bool,
    pub bounds: Bounds,
    pub screen_bounds: Bounds,
    pub ports: Vec<PortVisual>,
    pub content: ContentSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortVisual {
    pub id: PortId,
    pub direction: PortDirection,
    pub data_type: DataType,
    pub position: Point,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionVisual {
    pub id: ConnectionId,
    pub path: String,
}

/// Per-kind body content, rendered by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "slot", rename_all = "camelCase")]
pub enum ContentSlot {
    Value { value: Option<String> },
    Operation { name: String },
    /// An external page in an isolated frame.
    Frame { url: String, sandbox: &'static str },
    TextEditor { content: String },
    #[serde(rename_all = "camelCase")]
    Conversation {
        turns: usize,
        last_assistant: Option<String>,
        level: f32,
    },
    Journal { entries: Vec<String> },
}

impl ContentSlot {
    pub fn for_payload(payload: &NodePayload) -> Self {
        match payload {
            NodePayload::Input { value } => ContentSlot::Value {
                value: Some(value.clone()),
            },
            NodePayload::Output { value } => ContentSlot::Value {
                value: value.clone(),
            },
            NodePayload::Processor { operation } => ContentSlot::Operation {
                name: operation.clone(),
            },
            NodePayload::Web { url } => ContentSlot::Frame {
                url: url.clone(),
                sandbox: WEB_FRAME_SANDBOX,
            },
            NodePayload::Text { content } => ContentSlot::TextEditor {
                content: content.clone(),
            },
            NodePayload::Consciousness { transcript, level } => ContentSlot::Conversation {
                turns: transcript.len(),
                last_assistant: transcript
                    .iter()
                    .rev()
                    .find(|m| m.role == ChatRole::Assistant)
                    .map(|m| m.content.clone()),
                level: *level,
            },
            NodePayload::DreamJournal { entries } => ContentSlot::Journal {
                entries: entries.clone(),
            },
        }
    }
}

/// Project the board into a scene. `pending_wire` is the
/// `(port, pointer)` pair of an in-progress connection drag, in canvas
/// space.
pub fn project(graph: &BoardGraph, view: &ViewTransform, pending_wire: Option<(Point, Point)>) -> Scene {
    let nodes = graph.nodes().map(|n| node_visual(n, view)).collect();
    let connections = graph
        .connections()
        .map(|c| ConnectionVisual {
            id: c.id,
            path: c.path.clone(),
        })
        .collect();
    log::trace!("projected scene at zoom {:.2}", view.zoom);
    Scene {
        transform: view.affine().as_coeffs(),
        zoom: view.zoom,
        pan: view.pan,
        nodes,
        connections,
        pending_wire: pending_wire.map(|(from, to)| connection_path(from, to)),
    }
}

fn node_visual(node: &Node, view: &ViewTransform) -> NodeVisual {
    let bounds = node.bounds();
    let origin = view.canvas_to_screen(node.position);
    let screen_bounds = Bounds {
        x: origin.x,
        y: origin.y,
        width: bounds.width * view.zoom,
        height: bounds.height * view.zoom,
    };
    NodeVisual {
        id: node.id,
        kind: node.kind,
        title: node.title.clone(),
        status: node.status,
        selected: node.selected,
        bounds,
        screen_bounds,
        ports: node
            .ports
            .iter()
            .map(|p| PortVisual {
                id: p.id,
                direction: p.direction,
                data_type: p.data_type,
                position: node.position + p.offset,
                connected: p.connected,
            })
            .collect(),
        content: ContentSlot::for_payload(&node.payload),
    }
}
