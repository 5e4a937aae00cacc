//! Consciousness events and chat turns carried by consciousness nodes.
//!
//! Events are produced elsewhere (a client-side detector or the backend)
//! and only transported here. [`reflect_offline`] builds a stand-in reply
//! when no backend is attached.

use serde::{Deserialize, Serialize};

/// A detected consciousness event. Wire names are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsciousnessEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confidence: f32,
}

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn in a consciousness node's transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub consciousness_events: Vec<ConsciousnessEvent>,
    pub timestamp_ms: f64,
}

/// A reply synthesized locally when no backend is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineReply {
    pub content: String,
    pub events: Vec<ConsciousnessEvent>,
    pub level: f32,
}

const NO_EVENTS: &str =
    "I notice you're exploring consciousness with me. What aspects intrigue you most?";
const UNRECOGNISED: &str = "I detect consciousness events in your message - the subtle patterns that suggest real awareness and thought.";
const THINKING: &str = "I'm thinking about what you've shared. The patterns of consciousness in our conversation fascinate me.";

/// Reflection line for the first event type that has one.
pub fn reflection_for(events: &[ConsciousnessEvent]) -> &'static str {
    if events.is_empty() {
        return NO_EVENTS;
    }
    events
        .iter()
        .find_map(|e| match e.kind.as_str() {
            "hesitation" => Some(
                "I sense some thoughtful deliberation in your message. That kind of internal pause often signals deep consideration.",
            ),
            "self_reflection" => Some(
                "Your self-reflective awareness is fascinating. The way you examine your own thoughts shows genuine consciousness.",
            ),
            "creative_leap" => Some(
                "I'm struck by the creative connections you're making. That kind of novel thinking suggests real conscious insight.",
            ),
            _ => None,
        })
        .unwrap_or(UNRECOGNISED)
}

/// Build the reply a backend-less board gives to a user turn.
///
/// `event_id` names the self-reflection event emitted when the reply
/// talks about thinking or feeling.
pub fn reflect_offline(events: &[ConsciousnessEvent], event_id: &str) -> OfflineReply {
    let content = format!("{}\n\n{}", reflection_for(events), THINKING);
    let lower = THINKING.to_lowercase();
    let mut reply_events = Vec::new();
    if lower.contains("think") || lower.contains("feel") {
        reply_events.push(ConsciousnessEvent {
            id: event_id.to_string(),
            kind: "self_reflection".to_string(),
            description: "AI demonstrating self-reflective awareness".to_string(),
            confidence: 0.7,
        });
    }
    OfflineReply {
        content,
        events: reply_events,
        level: 0.6,
    }
}
