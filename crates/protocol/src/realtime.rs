//! Frames exchanged over the realtime websocket feed.
//!
//! Outbound frames are JSON objects. The first frame after a connection
//! opens is always the authentication frame; chat messages follow.

use serde::{Deserialize, Serialize};

/// Authentication frame, sent exactly once immediately after the socket
/// opens: `{"type":"auth","token":"..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthFrame {
    Auth { token: String },
}

/// Outbound chat message payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub conversation_id: String,
    pub content: String,
}
