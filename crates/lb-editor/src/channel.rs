//! Message channel between consciousness nodes and an assistant backend.
//!
//! The channel is an append-only outbox/inbox pair. The host drains the
//! outbox onto its socket and pushes whatever arrives into the inbox;
//! [`MessageChannel::apply_inbox`] folds deliveries into the board in
//! arrival order, after any local edits that preceded it.
//!
//! Wire JSON keeps the socket protocol's camelCase names:
//!
//! ```json
//! {"type": "ai_response", "nodeId": "consciousness_2", "content": "…",
//!  "consciousnessEvents": [], "consciousnessLevel": 0.6}
//! ```

use crate::state::CanvasState;
use lb_core::consciousness::{ChatMessage, ChatRole, ConsciousnessEvent, reflect_offline};
use lb_core::model::{NodePayload, NodeStatus};
use lb_core::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A user turn waiting to be sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    pub node_id: NodeId,
    pub message: String,
    #[serde(default)]
    pub consciousness_events: Vec<ConsciousnessEvent>,
    #[serde(default)]
    pub timestamp_ms: f64,
}

/// A completed assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub node_id: NodeId,
    pub content: String,
    #[serde(default)]
    pub consciousness_events: Vec<ConsciousnessEvent>,
    #[serde(default)]
    pub consciousness_level: f32,
}

/// The backend could not answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelFailure {
    pub node_id: NodeId,
    pub error: String,
}

/// Anything the backend delivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Incoming {
    AiResponse(AssistantReply),
    Error(ChannelFailure),
}

impl Incoming {
    pub fn node_id(&self) -> NodeId {
        match self {
            Incoming::AiResponse(reply) => reply.node_id,
            Incoming::Error(failure) => failure.node_id,
        }
    }
}

#[derive(Debug, Default)]
pub struct MessageChannel {
    outbox: Vec<UserMessage>,
    inbox: VecDeque<Incoming>,
    reflections: u64,
}

impl MessageChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn to a consciousness node and queue it for the
    /// backend. The node shows `running` until an answer arrives.
    /// Ignored for unknown or non-consciousness nodes.
    pub fn send(
        &mut self,
        state: &mut CanvasState,
        node_id: NodeId,
        message: &str,
        consciousness_events: Vec<ConsciousnessEvent>,
        now_ms: f64,
    ) -> bool {
        let Some(node) = state.graph.get_mut(node_id) else {
            return false;
        };
        let NodePayload::Consciousness { transcript, .. } = &mut node.payload else {
            return false;
        };
        transcript.push(ChatMessage {
            role: ChatRole::User,
            content: message.to_string(),
            consciousness_events: consciousness_events.clone(),
            timestamp_ms: now_ms,
        });
        node.status = NodeStatus::Running;
        self.outbox.push(UserMessage {
            node_id,
            message: message.to_string(),
            consciousness_events,
            timestamp_ms: now_ms,
        });
        log::debug!("queued message from {node_id}");
        true
    }

    pub fn pending_outgoing(&self) -> usize {
        self.outbox.len()
    }

    pub fn pending_incoming(&self) -> usize {
        self.inbox.len()
    }

    /// Hand every queued user turn to the host.
    pub fn drain_outbox(&mut self) -> Vec<UserMessage> {
        std::mem::take(&mut self.outbox)
    }

    pub fn receive(&mut self, incoming: Incoming) {
        self.inbox.push_back(incoming);
    }

    /// Queue a delivery from its wire JSON.
    pub fn receive_json(&mut self, json: &str) -> Result<(), String> {
        let incoming: Incoming =
            serde_json::from_str(json).map_err(|e| format!("invalid channel message: {e}"))?;
        self.receive(incoming);
        Ok(())
    }

    /// Apply queued deliveries in arrival order. Deliveries for nodes that
    /// no longer exist are dropped. Returns how many were applied.
    pub fn apply_inbox(&mut self, state: &mut CanvasState, now_ms: f64) -> usize {
        let mut applied = 0;
        while let Some(incoming) = self.inbox.pop_front() {
            let node_id = incoming.node_id();
            let Some(node) = state.graph.get_mut(node_id) else {
                log::debug!("dropping delivery for deleted node {node_id}");
                continue;
            };
            match incoming {
                Incoming::AiResponse(reply) => {
                    let NodePayload::Consciousness { transcript, level } = &mut node.payload else {
                        log::warn!("dropping reply for {} node {node_id}", node.kind.name());
                        continue;
                    };
                    transcript.push(ChatMessage {
                        role: ChatRole::Assistant,
                        content: reply.content,
                        consciousness_events: reply.consciousness_events,
                        timestamp_ms: now_ms,
                    });
                    *level = reply.consciousness_level;
                    node.status = NodeStatus::Success;
                }
                Incoming::Error(failure) => {
                    log::warn!("channel failure for {node_id}: {}", failure.error);
                    node.status = NodeStatus::Error;
                }
            }
            applied += 1;
        }
        applied
    }

    /// Answer every queued user turn locally, for boards with no backend.
    /// Replies land in the inbox like any other delivery.
    pub fn respond_offline(&mut self) -> usize {
        let pending = self.drain_outbox();
        for message in &pending {
            self.reflections += 1;
            let reply = reflect_offline(
                &message.consciousness_events,
                &format!("ai_reflection_{}", self.reflections),
            );
            self.receive(Incoming::AiResponse(AssistantReply {
                node_id: message.node_id,
                content: reply.content,
                consciousness_events: reply.events,
                consciousness_level: reply.level,
            }));
        }
        pending.len()
    }
}
