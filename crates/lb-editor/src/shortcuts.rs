//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.
//!
//! - Delete / Backspace = delete selected nodes
//! - Escape = deselect
//! - Single letters switch tools (one per node kind)

use crate::tools::ToolKind;
use lb_core::model::NodeKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    Tool(ToolKind),

    // ── Edit ──
    Delete,
    SelectAll,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,

    // ── UI ──
    Deselect,
}

impl ShortcutAction {
    /// Whether the action edits the board or switches tools, and so must
    /// not fire while the user is typing into a field.
    pub fn is_editing(self) -> bool {
        matches!(self, ShortcutAction::Tool(_) | ShortcutAction::SelectAll)
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"v"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, _alt: bool, meta: bool) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // Deletion and Escape ignore every modifier; letters do not.
        match key {
            "Delete" | "Backspace" => return Some(ShortcutAction::Delete),
            "Escape" => return Some(ShortcutAction::Deselect),
            _ => {}
        }

        if cmd {
            return match key {
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }
        if shift {
            return None;
        }

        let tool = match key {
            "v" | "V" => ToolKind::Select,
            "i" | "I" => ToolKind::Place(NodeKind::Input),
            "p" | "P" => ToolKind::Place(NodeKind::Processor),
            "o" | "O" => ToolKind::Place(NodeKind::Output),
            "w" | "W" => ToolKind::Place(NodeKind::Web),
            "t" | "T" => ToolKind::Place(NodeKind::Text),
            "c" | "C" => ToolKind::Place(NodeKind::Consciousness),
            "d" | "D" => ToolKind::Place(NodeKind::DreamJournal),
            _ => return None,
        };
        Some(ShortcutAction::Tool(tool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_tool_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("v", false, false, false, false),
            Some(ShortcutAction::Tool(ToolKind::Select))
        );
        assert_eq!(
            ShortcutMap::resolve("c", false, false, false, false),
            Some(ShortcutAction::Tool(ToolKind::Place(NodeKind::Consciousness)))
        );
        assert_eq!(
            ShortcutMap::resolve("D", false, false, false, false),
            Some(ShortcutAction::Tool(ToolKind::Place(NodeKind::DreamJournal)))
        );
        assert_eq!(ShortcutMap::resolve("t", false, true, false, false), None);
    }

    #[test]
    fn resolve_edit_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, true, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Deselect)
        );
        assert_eq!(
            ShortcutMap::resolve("a", true, false, false, false),
            Some(ShortcutAction::SelectAll)
        );
    }

    #[test]
    fn delete_with_command_modifier() {
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, true),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Delete", true, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", true, true, false, false),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn resolve_view_shortcuts_with_meta() {
        assert_eq!(
            ShortcutMap::resolve("=", false, false, false, true),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("-", true, false, false, false),
            Some(ShortcutAction::ZoomOut)
        );
        assert_eq!(
            ShortcutMap::resolve("0", false, false, false, true),
            Some(ShortcutAction::ResetView)
        );
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("v", true, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("F5", false, false, false, false), None);
    }

    #[test]
    fn editing_actions() {
        assert!(ShortcutAction::Tool(ToolKind::Select).is_editing());
        assert!(!ShortcutAction::Deselect.is_editing());
        assert!(!ShortcutAction::Delete.is_editing());
    }
}
