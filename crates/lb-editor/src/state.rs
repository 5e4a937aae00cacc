//! Canvas state machine.
//!
//! `CanvasState` owns the board graph, the view transform, the selection
//! and the in-progress drag. Input events go through [`CanvasState::apply`]
//! (or the reducer form [`apply_event`]); tools turn pointer events into
//! [`CanvasAction`]s that [`CanvasState::dispatch`] applies.
//!
//! None of the operations here fail. Unknown node ids are ignored and
//! zoom is clamped to the configured range.

use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{PointerContext, Tool, ToolKind, tool_for};
use lb_core::model::{Endpoint, Node, NodeKind, NodePayload, NodeStatus};
use lb_core::{
    BoardGraph, BoardSeed, CanvasConfig, ConnectionId, NodeId, Point, Size, ViewTransform, Viewport,
    ZoomDirection,
};
use lb_render::{Scene, hit_test, hit_test_port, project};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A state change requested by a tool or a shortcut.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    AddNode { kind: NodeKind, position: Point },
    SelectNode { id: NodeId, additive: bool },
    ClearSelection,
    SelectAll,
    BeginNodeDrag { id: NodeId, pointer: Point },
    BeginCanvasDrag { pointer: Point },
    BeginConnectionDrag { from: Endpoint, pointer: Point },
    UpdateDrag { pointer: Point },
    EndDrag,
    /// Zoom about a screen point.
    Zoom { pointer: Point, direction: ZoomDirection },
    /// Zoom about the viewport centre.
    ZoomCentered(ZoomDirection),
    DeleteSelected,
    DeleteNode(NodeId),
    ResetView,
    SetTool(ToolKind),
}

/// Which drag, if any, is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    None,
    Node,
    Canvas,
    Connection,
}

/// In-progress drag. Pointer positions are screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    None,
    Node {
        anchor: Point,
        last: Point,
        /// Pointer minus the grabbed node's screen position at drag start.
        offset: Point,
    },
    Canvas {
        anchor: Point,
        last: Point,
    },
    Connection {
        from: Endpoint,
        /// Canvas-space position of the source port.
        origin: Point,
        pointer: Point,
    },
}

impl DragState {
    pub fn kind(&self) -> DragKind {
        match self {
            DragState::None => DragKind::None,
            DragState::Node { .. } => DragKind::Node,
            DragState::Canvas { .. } => DragKind::Canvas,
            DragState::Connection { .. } => DragKind::Connection,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, DragState::None)
    }
}

/// The canvas: board graph, view, selection, tool, and drag.
pub struct CanvasState {
    pub graph: BoardGraph,
    pub view: ViewTransform,
    pub config: CanvasConfig,
    pub viewport: Viewport,
    tool: Box<dyn Tool>,
    selection: HashSet<NodeId>,
    drag: DragState,
}

impl CanvasState {
    /// An empty board with the default config.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_config(CanvasConfig::default(), viewport)
    }

    pub fn with_config(config: CanvasConfig, viewport: Viewport) -> Self {
        Self::from_graph(BoardGraph::new(), config, viewport)
    }

    /// Build the initial board from a seed.
    pub fn from_seed(seed: &BoardSeed, config: CanvasConfig, viewport: Viewport) -> Result<Self, String> {
        config.validate()?;
        Ok(Self::from_graph(seed.build()?, config, viewport))
    }

    fn from_graph(graph: BoardGraph, config: CanvasConfig, viewport: Viewport) -> Self {
        Self {
            graph,
            view: ViewTransform::default(),
            config,
            viewport,
            tool: tool_for(ToolKind::Select),
            selection: HashSet::new(),
            drag: DragState::None,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn tool(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn selection(&self) -> &HashSet<NodeId> {
        &self.selection
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected ids in paint order.
    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .filter(|n| self.selection.contains(&n.id))
            .map(|n| n.id)
            .collect()
    }

    /// Renderable projection of the current state.
    pub fn scene(&self) -> Scene {
        let pending = match self.drag {
            DragState::Connection { origin, pointer, .. } => {
                Some((origin, self.view.screen_to_canvas(pointer)))
            }
            _ => None,
        };
        project(&self.graph, &self.view, pending)
    }

    /// Resolve what lies under a screen point.
    pub fn pointer_context(&self, screen: Point) -> PointerContext {
        let canvas = self.view.screen_to_canvas(screen);
        let node = hit_test(&self.graph, canvas);
        PointerContext {
            screen,
            canvas,
            node,
            node_selected: node.is_some_and(|id| self.is_selected(id)),
            port: hit_test_port(&self.graph, canvas, self.config.port_hit_radius),
        }
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Create a node of `kind` at a canvas-space position and return its id.
    pub fn add_node(&mut self, kind: NodeKind, position: Point) -> NodeId {
        loop {
            let id = NodeId::with_prefix(kind.id_prefix());
            // Seeded ids may already occupy a generated name.
            if self.graph.add_node(Node::new(id, kind, position)).is_ok() {
                log::debug!("added {} node {id} at ({:.1}, {:.1})", kind.name(), position.x, position.y);
                return id;
            }
        }
    }

    /// Create a node under a screen-space point.
    pub fn add_node_at_screen(&mut self, kind: NodeKind, screen: Point) -> NodeId {
        self.add_node(kind, self.view.screen_to_canvas(screen))
    }

    /// Remove one node, its selection entry, and its connections.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if self.graph.remove_node(id).is_none() {
            return false;
        }
        self.selection.remove(&id);
        self.drop_stale_drag();
        true
    }

    /// Remove every selected node and every connection touching one.
    /// Returns the removed ids in paint order.
    pub fn delete_selected(&mut self) -> Vec<NodeId> {
        let doomed = self.selected_ids();
        for &id in &doomed {
            self.graph.remove_node(id);
        }
        self.selection.clear();
        self.drop_stale_drag();
        if !doomed.is_empty() {
            log::debug!("deleted {} selected nodes", doomed.len());
        }
        doomed
    }

    /// Resize a node, clamped to the configured minimum size.
    pub fn resize_node(&mut self, id: NodeId, width: f32, height: f32) -> bool {
        let size = Size::new(
            width.max(self.config.min_node_width),
            height.max(self.config.min_node_height),
        );
        self.graph.resize_node(id, size)
    }

    pub fn set_status(&mut self, id: NodeId, status: NodeStatus) -> bool {
        let Some(node) = self.graph.get_mut(id) else {
            return false;
        };
        node.status = status;
        true
    }

    pub fn set_title(&mut self, id: NodeId, title: &str) -> bool {
        let Some(node) = self.graph.get_mut(id) else {
            return false;
        };
        node.title = title.to_string();
        true
    }

    /// Replace a node's payload. Ignored when the payload belongs to a
    /// different kind.
    pub fn update_payload(&mut self, id: NodeId, payload: NodePayload) -> bool {
        let Some(node) = self.graph.get_mut(id) else {
            return false;
        };
        if payload.kind() != node.kind {
            log::warn!("ignoring {} payload for {} node {id}", payload.kind().name(), node.kind.name());
            return false;
        }
        node.payload = payload;
        true
    }

    pub fn connect(&mut self, source: Endpoint, destination: Endpoint) -> Result<ConnectionId, String> {
        self.graph.connect(source, destination)
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        self.graph.disconnect(id)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Replace the selection with `id`, or toggle it when `additive`.
    /// Unknown ids leave the selection untouched.
    pub fn select_node(&mut self, id: NodeId, additive: bool) -> bool {
        if !self.graph.contains(id) {
            return false;
        }
        if additive {
            let now = !self.selection.contains(&id);
            self.set_selected(id, now);
        } else {
            self.clear_selection();
            self.set_selected(id, true);
        }
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        for id in std::mem::take(&mut self.selection) {
            if let Some(node) = self.graph.get_mut(id) {
                node.selected = false;
            }
        }
        true
    }

    pub fn select_all(&mut self) -> bool {
        let ids = self.graph.node_ids();
        let changed = ids.len() != self.selection.len();
        for id in ids {
            self.set_selected(id, true);
        }
        changed
    }

    fn set_selected(&mut self, id: NodeId, selected: bool) {
        if selected {
            self.selection.insert(id);
        } else {
            self.selection.remove(&id);
        }
        if let Some(node) = self.graph.get_mut(id) {
            node.selected = selected;
        }
    }

    // ─── Drag ────────────────────────────────────────────────────────────

    /// Start dragging the selection from `id`. An unselected node becomes
    /// the sole selection first.
    pub fn begin_node_drag(&mut self, id: NodeId, pointer: Point) -> bool {
        let Some(node) = self.graph.get(id) else {
            return false;
        };
        let offset = pointer - self.view.canvas_to_screen(node.position);
        if !self.is_selected(id) {
            self.select_node(id, false);
        }
        self.drag = DragState::Node {
            anchor: pointer,
            last: pointer,
            offset,
        };
        log::debug!("node drag from {id} with {} selected", self.selection.len());
        true
    }

    /// Start panning the view.
    pub fn begin_canvas_drag(&mut self, pointer: Point) -> bool {
        self.drag = DragState::Canvas {
            anchor: pointer,
            last: pointer,
        };
        log::debug!("canvas drag at ({:.1}, {:.1})", pointer.x, pointer.y);
        true
    }

    /// Start a wire preview from an output port.
    pub fn begin_connection_drag(&mut self, from: Endpoint, pointer: Point) -> bool {
        let Some(origin) = self
            .graph
            .get(from.node)
            .and_then(|n| n.port_position(from.port))
        else {
            return false;
        };
        // TODO: form a connection on release over an input port once the
        // gesture is settled with product.
        self.drag = DragState::Connection { from, origin, pointer };
        log::debug!("wire preview from {}.{}", from.node, from.port);
        true
    }

    /// Follow the pointer. Node drags move every selected node by the
    /// zoom-compensated delta; canvas drags pan by the screen delta.
    pub fn update_drag(&mut self, pointer: Point) -> bool {
        match &mut self.drag {
            DragState::None => false,
            DragState::Node { last, .. } => {
                let delta = self.view.screen_delta_to_canvas(pointer - *last);
                *last = pointer;
                for &id in &self.selection {
                    self.graph.move_node(id, delta);
                }
                log::trace!("dragged selection by ({:.2}, {:.2})", delta.x, delta.y);
                true
            }
            DragState::Canvas { last, .. } => {
                self.view.pan_by(pointer - *last);
                *last = pointer;
                true
            }
            DragState::Connection { pointer: p, .. } => {
                *p = pointer;
                true
            }
        }
    }

    /// Return to idle. Idempotent.
    pub fn end_drag(&mut self) {
        if self.drag.is_active() {
            log::debug!("{:?} drag ended", self.drag.kind());
        }
        self.drag = DragState::None;
    }

    /// A wire preview cannot outlive its source node.
    fn drop_stale_drag(&mut self) {
        if let DragState::Connection { from, .. } = self.drag
            && !self.graph.contains(from.node)
        {
            self.drag = DragState::None;
        }
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// Zoom one step about a screen point, keeping the canvas point under
    /// it fixed.
    pub fn apply_zoom(&mut self, pointer: Point, direction: ZoomDirection) -> bool {
        self.view.zoom_at(pointer, direction, &self.config)
    }

    /// Zoom one step about the centre of the viewport.
    pub fn zoom_centered(&mut self, direction: ZoomDirection) -> bool {
        let centre = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.apply_zoom(centre, direction)
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport { width, height };
    }

    /// Switch tools. Any drag in progress continues.
    pub fn set_tool(&mut self, kind: ToolKind) -> bool {
        if self.tool.kind() == kind {
            return false;
        }
        log::debug!("tool {} -> {}", self.tool.kind().name(), kind.name());
        self.tool = tool_for(kind);
        true
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Apply one action. Returns `true` if anything visible may have changed.
    pub fn dispatch(&mut self, action: CanvasAction) -> bool {
        match action {
            CanvasAction::AddNode { kind, position } => {
                self.add_node(kind, position);
                true
            }
            CanvasAction::SelectNode { id, additive } => self.select_node(id, additive),
            CanvasAction::ClearSelection => self.clear_selection(),
            CanvasAction::SelectAll => self.select_all(),
            CanvasAction::BeginNodeDrag { id, pointer } => self.begin_node_drag(id, pointer),
            CanvasAction::BeginCanvasDrag { pointer } => self.begin_canvas_drag(pointer),
            CanvasAction::BeginConnectionDrag { from, pointer } => self.begin_connection_drag(from, pointer),
            CanvasAction::UpdateDrag { pointer } => self.update_drag(pointer),
            CanvasAction::EndDrag => {
                let was_active = self.drag.is_active();
                self.end_drag();
                was_active
            }
            CanvasAction::Zoom { pointer, direction } => self.apply_zoom(pointer, direction),
            CanvasAction::ZoomCentered(direction) => self.zoom_centered(direction),
            CanvasAction::DeleteSelected => !self.delete_selected().is_empty(),
            CanvasAction::DeleteNode(id) => self.delete_node(id),
            CanvasAction::ResetView => {
                self.reset_view();
                true
            }
            CanvasAction::SetTool(kind) => self.set_tool(kind),
        }
    }

    /// Apply one input event. Returns `true` if a redraw is needed.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerMove { x, y, .. }
            | InputEvent::PointerUp { x, y, .. } => {
                let ctx = self.pointer_context(Point::new(*x, *y));
                let actions = self.tool.handle(event, &ctx);
                let mut changed = false;
                for action in actions {
                    changed |= self.dispatch(action);
                }
                changed
            }
            InputEvent::Wheel { x, y, delta_y } => {
                if *delta_y == 0.0 {
                    return false;
                }
                self.apply_zoom(Point::new(*x, *y), ZoomDirection::from_wheel_delta(*delta_y))
            }
            InputEvent::Key {
                key,
                modifiers,
                from_text_input,
            } => self.handle_key(key, *modifiers, *from_text_input),
            InputEvent::SelectTool(kind) => self.set_tool(*kind),
        }
    }

    /// Resolve and apply a keyboard shortcut.
    ///
    /// Delete/Backspace acts on the selection wherever focus is, unless
    /// `scoped_delete` is set. Tool letters and select-all are ignored
    /// while typing.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers, from_text_input: bool) -> bool {
        let Some(shortcut) = ShortcutMap::resolve(key, modifiers.ctrl, modifiers.shift, modifiers.alt, modifiers.meta)
        else {
            return false;
        };
        if from_text_input
            && (shortcut.is_editing() || (shortcut == ShortcutAction::Delete && self.config.scoped_delete))
        {
            return false;
        }
        let action = match shortcut {
            ShortcutAction::Tool(kind) => CanvasAction::SetTool(kind),
            ShortcutAction::Delete => CanvasAction::DeleteSelected,
            ShortcutAction::SelectAll => CanvasAction::SelectAll,
            ShortcutAction::ZoomIn => CanvasAction::ZoomCentered(ZoomDirection::In),
            ShortcutAction::ZoomOut => CanvasAction::ZoomCentered(ZoomDirection::Out),
            ShortcutAction::ResetView => CanvasAction::ResetView,
            ShortcutAction::Deselect => CanvasAction::ClearSelection,
        };
        self.dispatch(action)
    }
}

/// Reducer form of [`CanvasState::apply`].
pub fn apply_event(mut state: CanvasState, event: &InputEvent) -> CanvasState {
    state.apply(event);
    state
}

impl Clone for CanvasState {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            view: self.view,
            config: self.config.clone(),
            viewport: self.viewport,
            tool: tool_for(self.tool.kind()),
            selection: self.selection.clone(),
            drag: self.drag,
        }
    }
}

impl fmt::Debug for CanvasState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasState")
            .field("nodes", &self.graph.len())
            .field("view", &self.view)
            .field("tool", &self.tool.kind())
            .field("selection", &self.selection)
            .field("drag", &self.drag)
            .finish()
    }
}
