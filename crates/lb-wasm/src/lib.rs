//! WASM bridge for Liminal Board: exposes the canvas state machine to
//! JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. Every query returns JSON;
//! every input handler returns `true` when the host should redraw.

use lb_core::consciousness::ConsciousnessEvent;
use lb_core::model::{Endpoint, NodeKind, NodePayload, NodeStatus};
use lb_core::{BoardSeed, CanvasConfig, NodeId, Point, Viewport};
use lb_editor::channel::MessageChannel;
use lb_editor::input::{InputEvent, Modifiers};
use lb_editor::state::CanvasState;
use lb_editor::tools::ToolKind;
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
///
/// Holds the canvas state and the message channel. All interaction from
/// the page goes through this struct.
#[wasm_bindgen]
pub struct BoardCanvas {
    state: CanvasState,
    channel: MessageChannel,
}

#[wasm_bindgen]
impl BoardCanvas {
    /// Create an empty board with the given canvas size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();
        Self {
            state: CanvasState::new(Viewport { width, height }),
            channel: MessageChannel::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize_viewport(width, height);
    }

    /// Replace the board with a seed document. Pass an empty string for
    /// the default welcome board. Returns `{"ok":true}` or
    /// `{"ok":false,"error":"..."}`; an invalid seed leaves the current
    /// board in place.
    pub fn load_seed(&mut self, json: &str) -> String {
        let seed = if json.trim().is_empty() {
            Ok(lb_core::default_seed())
        } else {
            BoardSeed::from_json(json)
        };
        let built = seed.and_then(|seed| CanvasState::from_seed(&seed, self.state.config.clone(), self.state.viewport));
        match built {
            Ok(state) => {
                self.state = state;
                self.channel = MessageChannel::new();
                ok_json()
            }
            Err(error) => error_json(&error),
        }
    }

    /// Apply a (possibly partial) config document. Same result shape as
    /// [`BoardCanvas::load_seed`].
    pub fn set_config_json(&mut self, json: &str) -> String {
        match CanvasConfig::from_json(json) {
            Ok(config) => {
                self.state.config = config;
                ok_json()
            }
            Err(error) => error_json(&error),
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        self.state.apply(&InputEvent::PointerDown { x, y, modifiers })
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        self.state.apply(&InputEvent::PointerMove { x, y, modifiers })
    }

    /// Attach to the window, not the canvas element, so a release outside
    /// the canvas still ends the drag.
    pub fn handle_pointer_up(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        self.state.apply(&InputEvent::PointerUp { x, y, modifiers })
    }

    pub fn handle_wheel(&mut self, x: f32, y: f32, delta_y: f32) -> bool {
        self.state.apply(&InputEvent::Wheel { x, y, delta_y })
    }

    /// `key` is `KeyboardEvent.key`. Set `from_text_input` when the event
    /// target is an editable element.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        from_text_input: bool,
    ) -> bool {
        self.state.apply(&InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers { shift, ctrl, alt, meta },
            from_text_input,
        })
    }

    /// Switch tools by name (`"select"` or a node kind). Unknown names
    /// are ignored.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(kind) => self.state.apply(&InputEvent::SelectTool(kind)),
            None => false,
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.state.tool().name().to_string()
    }

    pub fn reset_view(&mut self) {
        self.state.reset_view();
    }

    pub fn get_zoom(&self) -> f32 {
        self.state.view.zoom
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// The renderable scene as JSON.
    pub fn scene_json(&self) -> String {
        serde_json::to_string(&self.state.scene()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Selected node ids in paint order, as a JSON array.
    pub fn selected_ids_json(&self) -> String {
        let selected = self.state.selected_ids();
        let ids: Vec<&str> = selected.iter().map(|id| id.as_str()).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// `"none"`, `"node"`, `"canvas"` or `"connection"`.
    pub fn drag_kind(&self) -> String {
        serde_json::to_value(self.state.drag().kind())
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    // ─── Node edits ──────────────────────────────────────────────────────

    /// Create a node under a screen point. Returns the new id, or an
    /// empty string for an unknown kind.
    pub fn add_node(&mut self, kind: &str, x: f32, y: f32) -> String {
        match NodeKind::from_name(kind) {
            Some(kind) => self
                .state
                .add_node_at_screen(kind, Point::new(x, y))
                .as_str()
                .to_string(),
            None => String::new(),
        }
    }

    pub fn select_node(&mut self, node_id: &str, additive: bool) -> bool {
        NodeId::lookup(node_id).is_some_and(|id| self.state.select_node(id, additive))
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        NodeId::lookup(node_id).is_some_and(|id| self.state.delete_node(id))
    }

    pub fn resize_node(&mut self, node_id: &str, width: f32, height: f32) -> bool {
        NodeId::lookup(node_id).is_some_and(|id| self.state.resize_node(id, width, height))
    }

    pub fn set_node_title(&mut self, node_id: &str, title: &str) -> bool {
        NodeId::lookup(node_id).is_some_and(|id| self.state.set_title(id, title))
    }

    /// `status` is `"idle"`, `"running"`, `"success"` or `"error"`.
    pub fn set_node_status(&mut self, node_id: &str, status: &str) -> bool {
        let Some(id) = NodeId::lookup(node_id) else {
            return false;
        };
        match serde_json::from_value::<NodeStatus>(serde_json::Value::String(status.to_string())) {
            Ok(status) => self.state.set_status(id, status),
            Err(_) => false,
        }
    }

    /// Replace a node's payload from its JSON form (tagged by `kind`).
    pub fn set_node_payload_json(&mut self, node_id: &str, json: &str) -> bool {
        let Some(id) = NodeId::lookup(node_id) else {
            return false;
        };
        match serde_json::from_str::<NodePayload>(json) {
            Ok(payload) => self.state.update_payload(id, payload),
            Err(_) => false,
        }
    }

    /// Connect `"node.port"` to `"node.port"`. Returns
    /// `{"ok":true,"id":"..."}` or `{"ok":false,"error":"..."}`.
    pub fn connect(&mut self, from: &str, to: &str) -> String {
        let result = Endpoint::parse(from)
            .and_then(|from| Endpoint::parse(to).map(|to| (from, to)))
            .and_then(|(from, to)| self.state.connect(from, to));
        match result {
            Ok(id) => serde_json::json!({ "ok": true, "id": id }).to_string(),
            Err(error) => serde_json::json!({ "ok": false, "error": error }).to_string(),
        }
    }

    pub fn disconnect(&mut self, connection_id: &str) -> bool {
        NodeId::lookup(connection_id).is_some_and(|id| self.state.disconnect(id))
    }

    // ─── Message channel ─────────────────────────────────────────────────

    /// Send a user turn from a consciousness node. `events_json` is an
    /// array of consciousness events (may be empty).
    pub fn send_message(&mut self, node_id: &str, message: &str, events_json: &str) -> bool {
        let Some(id) = NodeId::lookup(node_id) else {
            return false;
        };
        let events: Vec<ConsciousnessEvent> = if events_json.trim().is_empty() {
            Vec::new()
        } else {
            match serde_json::from_str(events_json) {
                Ok(events) => events,
                Err(_) => return false,
            }
        };
        self.channel
            .send(&mut self.state, id, message, events, now_ms())
    }

    /// Queued user turns as a JSON array, emptying the outbox.
    pub fn drain_outbox_json(&mut self) -> String {
        serde_json::to_string(&self.channel.drain_outbox()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Deliver one backend message (`ai_response` or `error`) and apply it.
    /// Returns `{"ok":true,"applied":n}` or `{"ok":false,"error":"..."}`.
    pub fn deliver_json(&mut self, json: &str) -> String {
        if let Err(error) = self.channel.receive_json(json) {
            return error_json(&error);
        }
        let applied = self.channel.apply_inbox(&mut self.state, now_ms());
        serde_json::json!({ "ok": true, "applied": applied }).to_string()
    }

    /// Answer queued turns locally when no backend is connected.
    pub fn respond_offline(&mut self) -> bool {
        self.channel.respond_offline();
        self.channel.apply_inbox(&mut self.state, now_ms()) > 0
    }
}

fn ok_json() -> String {
    serde_json::json!({ "ok": true }).to_string()
}

fn error_json(error: &str) -> String {
    serde_json::json!({ "ok": false, "error": error }).to_string()
}

fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        0.0
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Liminal Board WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate a seed document. Returns JSON: `{"ok":true}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_seed(json: &str) -> String {
    match BoardSeed::from_json(json).and_then(|seed| seed.build()) {
        Ok(_) => ok_json(),
        Err(error) => error_json(&error),
    }
}
