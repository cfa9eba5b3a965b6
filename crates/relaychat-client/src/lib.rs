//! relaychat-client
//!
//! The session side of relaychat: an in-memory chat thread, the held
//! upstream session identifier, and the transport that talks to the relay.
//!
//! Front ends drive a [`ChatSession`] and render from its
//! [`SessionEvent`] stream.

pub mod error;
pub mod event;
pub mod session;
pub mod state;
pub mod transport;

pub use error::{SendError, TransportError};
pub use event::{Notice, NoticeLevel, SessionEvent};
pub use session::{ChatSession, ClientOptions};
pub use state::SessionState;
pub use transport::{ChatTransport, HttpTransport};
