/**
 * Presence Frames
 *
 * Wire format of the realtime presence channel. Every frame is a JSON object
 * tagged by its `type` field:
 *
 * ```json
 * {"type": "AUTH", "token": "<jwt>"}
 * {"type": "ONLINE_USERS", "users": ["<uuid>", "..."]}
 * ```
 *
 * Decoding is lenient about kinds it does not know (they are reported as
 * `DecodedFrame::Unrecognized`) and strict about shape: a frame that is not
 * JSON, has no `type`, or carries a known `type` with the wrong fields is a
 * `SharedError::MalformedFrame`.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// A frame on the presence channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceFrame {
    /// Client → server: authenticate a socket opened without a query token
    Auth { token: String },
    /// Server → client: the complete current online-user set
    OnlineUsers { users: Vec<Uuid> },
}

impl PresenceFrame {
    /// Kinds this build understands
    pub const KNOWN_KINDS: [&'static str; 2] = ["AUTH", "ONLINE_USERS"];

    pub fn auth(token: impl Into<String>) -> Self {
        Self::Auth {
            token: token.into(),
        }
    }

    pub fn online_users(users: Vec<Uuid>) -> Self {
        Self::OnlineUsers { users }
    }

    /// Serialize to the JSON text sent over the socket
    pub fn to_text(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Result of decoding an inbound text frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrame {
    Frame(PresenceFrame),
    /// Well-formed JSON with a `type` this build does not handle
    Unrecognized(String),
}

/// Decode an inbound text frame
pub fn decode_frame(text: &str) -> Result<DecodedFrame, SharedError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| SharedError::malformed(format!("not JSON: {}", e)))?;

    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| SharedError::malformed("frame has no string `type` field"))?;

    if !PresenceFrame::KNOWN_KINDS.contains(&kind) {
        return Ok(DecodedFrame::Unrecognized(kind.to_string()));
    }

    let kind = kind.to_string();
    serde_json::from_value(value)
        .map(DecodedFrame::Frame)
        .map_err(|e| SharedError::malformed(format!("bad {} frame: {}", kind, e)))
}
