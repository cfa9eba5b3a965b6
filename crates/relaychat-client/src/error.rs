use std::time::Duration;

use relaychat_core::error::ReplyError;
use thiserror::Error;

/// Failure talking to the relay.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx from the relay. `message` is the `{error}` envelope text when
    /// the relay sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Reply(#[from] ReplyError),

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a message is already being sent")]
    Busy,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SendError {
    /// Whether this failure leaves a retryable message in the thread.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SendError::Timeout(_) | SendError::Transport(_))
    }
}
