use thiserror::Error;

/// Why a relay reply could not be turned into a [`ChatReply`].
///
/// [`ChatReply`]: crate::models::reply::ChatReply
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplyError {
    #[error("Empty response from chat service")]
    Empty,

    /// The relay (or the upstream behind it) answered with an `{error}` envelope.
    #[error("{0}")]
    Service(String),
}
