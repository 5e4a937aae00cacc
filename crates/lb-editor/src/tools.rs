//! Tool system for canvas interactions.
//!
//! Each tool translates pointer events into `CanvasAction`s that the
//! `CanvasState` applies. Tools never touch the board directly.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Select Tool | Place Tool |
//! |----------|-------------|------------|
//! | **Shift / ⌘ / Ctrl** | Toggle node in selection | — |

use crate::input::InputEvent;
use crate::state::CanvasAction;
use lb_core::model::{NodeKind, PortDirection};
use lb_core::{NodeId, Point};
use lb_render::PortHit;

/// The active tool decides what a canvas press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Select,
    /// Clicking the canvas creates a node of this kind.
    Place(NodeKind),
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Place(kind) => kind.name(),
        }
    }

    /// `"select"` or any node kind name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(ToolKind::Select),
            other => NodeKind::from_name(other).map(ToolKind::Place),
        }
    }
}

/// What is under the pointer, resolved by the state machine before the
/// tool runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerContext {
    pub screen: Point,
    pub canvas: Point,
    pub node: Option<NodeId>,
    /// Whether `node` is currently in the selection.
    pub node_selected: bool,
    pub port: Option<PortHit>,
}

/// Trait for tools that handle input and produce canvas actions.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle a pointer event, returning zero or more actions.
    fn handle(&mut self, event: &InputEvent, ctx: &PointerContext) -> Vec<CanvasAction>;
}

// ─── Select Tool ─────────────────────────────────────────────────────────

/// Selects, drags, and pans. Pressing an output port starts a wire
/// preview.
#[derive(Debug, Default)]
pub struct SelectTool;

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, event: &InputEvent, ctx: &PointerContext) -> Vec<CanvasAction> {
        let pointer = ctx.screen;
        match event {
            InputEvent::PointerDown { modifiers, .. } => {
                if let Some(port) = ctx.port
                    && port.direction == PortDirection::Output
                {
                    return vec![CanvasAction::BeginConnectionDrag {
                        from: port.endpoint,
                        pointer,
                    }];
                }

                match ctx.node {
                    Some(id) if modifiers.additive() => {
                        let mut actions = vec![CanvasAction::SelectNode { id, additive: true }];
                        // Toggling a selected node off does not start a drag.
                        if !ctx.node_selected {
                            actions.push(CanvasAction::BeginNodeDrag { id, pointer });
                        }
                        actions
                    }
                    Some(id) => {
                        let mut actions = Vec::with_capacity(2);
                        // Pressing a selected node keeps a multi-selection for dragging.
                        if !ctx.node_selected {
                            actions.push(CanvasAction::SelectNode { id, additive: false });
                        }
                        actions.push(CanvasAction::BeginNodeDrag { id, pointer });
                        actions
                    }
                    None => {
                        let mut actions = Vec::with_capacity(2);
                        if !modifiers.additive() {
                            actions.push(CanvasAction::ClearSelection);
                        }
                        actions.push(CanvasAction::BeginCanvasDrag { pointer });
                        actions
                    }
                }
            }
            InputEvent::PointerMove { .. } => vec![CanvasAction::UpdateDrag { pointer }],
            InputEvent::PointerUp { .. } => vec![CanvasAction::EndDrag],
            _ => vec![],
        }
    }
}

// ─── Place Tool ──────────────────────────────────────────────────────────

/// Creates one node per press at the pointer's canvas position. Leaves
/// selection and drag state alone.
#[derive(Debug)]
pub struct PlaceTool {
    kind: NodeKind,
    placed: bool,
}

impl PlaceTool {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            placed: false,
        }
    }
}

impl Tool for PlaceTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Place(self.kind)
    }

    fn handle(&mut self, event: &InputEvent, ctx: &PointerContext) -> Vec<CanvasAction> {
        match event {
            InputEvent::PointerDown { .. } => {
                if self.placed {
                    return vec![];
                }
                self.placed = true;
                vec![CanvasAction::AddNode {
                    kind: self.kind,
                    position: ctx.canvas,
                }]
            }
            // A drag begun under another tool still follows the pointer.
            InputEvent::PointerMove { .. } => vec![CanvasAction::UpdateDrag { pointer: ctx.screen }],
            InputEvent::PointerUp { .. } => {
                self.placed = false;
                vec![CanvasAction::EndDrag]
            }
            _ => vec![],
        }
    }
}

/// Build the tool object for a kind.
pub fn tool_for(kind: ToolKind) -> Box<dyn Tool> {
    match kind {
        ToolKind::Select => Box::new(SelectTool),
        ToolKind::Place(node_kind) => Box::new(PlaceTool::new(node_kind)),
    }
}
