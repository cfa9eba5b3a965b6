//! Request bodies on both hops of the relay.
//!
//! ```text
//! client ──ChatRequest / ClearRequest──▶ relay ──UpstreamRequest──▶ Subfeed
//! ```
//!
//! The relay reads whatever the client sent as a [`RelayRequest`], where
//! every field is optional, and decides what to do from there.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The action name that asks the relay to acknowledge a history clear.
pub const CLEAR_ACTION: &str = "clear";

/// Client → relay body for a chat turn.
///
/// `session_id` serializes as `null` when no session is held yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            session_id,
        }
    }
}

/// Client → relay body for `{"action": "clear"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClearRequest {
    pub action: RelayAction,
}

impl Default for ClearRequest {
    fn default() -> Self {
        Self {
            action: RelayAction::Clear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RelayAction {
    Clear,
}

/// What the relay accepts. Unknown actions are ignored and treated as a
/// normal chat turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl RelayRequest {
    pub fn is_clear(&self) -> bool {
        self.action.as_deref() == Some(CLEAR_ACTION)
    }

    /// Build the upstream body, or `None` when there is no usable message.
    pub fn to_upstream(&self) -> Option<UpstreamRequest> {
        let message = self.message.as_deref().filter(|m| !m.is_empty())?;
        Some(UpstreamRequest {
            message: message.to_string(),
            session_id: self.session_id.clone().filter(|s| !s.is_empty()),
        })
    }
}

/// Relay → upstream body. `session_id` is omitted entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,
}
