//! Reply bodies and the tolerant reply parser.
//!
//! Deployed relays have answered in two shapes:
//!
//! ```text
//! { "response": "...", "session_id": "..." }                    // flat
//! { "success": true, "data": { "response": "...", ... } }       // nested
//! ```
//!
//! [`ChatReply::from_value`] accepts both, probing `data` first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ReplyError;

/// Normalized view of one assistant turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatReply {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub token_estimate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<String>,
}

impl ChatReply {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Parse a relay reply body in either the flat or the `data`-nested shape.
    pub fn from_value(body: &Value) -> Result<Self, ReplyError> {
        if body.is_null() {
            return Err(ReplyError::Empty);
        }

        if let Some(error) = non_empty_str(body, "error") {
            return Err(ReplyError::Service(error));
        }

        let inner = body.get("data").filter(|d| d.is_object()).unwrap_or(body);

        let response = inner
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let session_id =
            non_empty_str(inner, "session_id").or_else(|| non_empty_str(body, "session_id"));

        let token_estimate = inner.get("token_estimate").and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        });

        let timestamp = inner
            .get("timestamp")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            response,
            session_id,
            token_estimate,
            timestamp,
        })
    }
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Relay acknowledgement of `{"action": "clear"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClearAck {
    pub success: bool,
    pub message: String,
}

impl Default for ClearAck {
    fn default() -> Self {
        Self {
            success: true,
            message: "Session cleared".to_string(),
        }
    }
}

/// The `{error}` envelope returned with every failure status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
}
