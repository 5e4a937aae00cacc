pub mod channel;
pub mod input;
pub mod shortcuts;
pub mod state;
pub mod tools;

pub use channel::{AssistantReply, ChannelFailure, Incoming, MessageChannel, UserMessage};
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use state::{CanvasAction, CanvasState, DragKind, DragState, apply_event};
pub use tools::{PointerContext, Tool, ToolKind};
