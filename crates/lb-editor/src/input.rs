//! Input abstraction layer.
//!
//! Normalizes pointer, wheel, keyboard, and toolbar events into a single
//! `InputEvent` enum consumed by the canvas state machine. Pointer and
//! wheel coordinates are screen space.

use crate::tools::ToolKind;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Whether a click should toggle rather than replace the selection.
    pub fn additive(&self) -> bool {
        self.shift || self.command()
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed over the canvas element.
    PointerDown { x: f32, y: f32, modifiers: Modifiers },

    /// Pointer moved anywhere in the window.
    PointerMove { x: f32, y: f32, modifiers: Modifiers },

    /// Pointer released anywhere in the window, including outside the
    /// canvas element.
    PointerUp { x: f32, y: f32, modifiers: Modifiers },

    /// Mouse wheel over the canvas. Negative `delta_y` zooms in.
    Wheel { x: f32, y: f32, delta_y: f32 },

    /// Key press. `from_text_input` is set when focus was in an editable
    /// field (a text node body, a chat box, any input elsewhere on the page).
    Key {
        key: String,
        modifiers: Modifiers,
        from_text_input: bool,
    },

    /// A toolbar button was clicked.
    SelectTool(ToolKind),
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
            from_text_input: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_modifiers() {
        assert!(!Modifiers::NONE.additive());
        assert!(Modifiers::SHIFT.additive());
        assert!(
            Modifiers {
                meta: true,
                ..Modifiers::NONE
            }
            .additive()
        );
    }
}
