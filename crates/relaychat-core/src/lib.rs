//! relaychat-core
//!
//! Pure wire and domain types shared by the relay and the session client.
//! No I/O here. This is the vocabulary both sides of the proxy agree on.

pub mod error;
pub mod models;
