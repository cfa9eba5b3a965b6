//! The chat session: thread, held session identifier, failed-message marker.
//!
//! # Lifecycle of a send
//!
//! ```text
//! send(text)
//!   ├─ reject if empty or another send is in flight
//!   ├─ append user message, loading = true
//!   ├─ transport.send under timeout + cancellation
//!   ├─ ok  → append assistant message, adopt session id
//!   ├─ err → flag the user message for retry, emit an error notice
//!   └─ loading = false (always, via drop guard)
//! ```
//!
//! A [`ChatSession`] is `Sync`; wrap it in an `Arc` to drive it from more
//! than one task. The internal lock is never held across an await.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use relaychat_core::models::message::Message;
use relaychat_core::models::reply::ChatReply;
use relaychat_core::models::request::ChatRequest;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::SendError;
use crate::event::{Notice, SessionEvent};
use crate::state::SessionState;
use crate::transport::ChatTransport;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upper bound on a single relay round trip.
    pub timeout: Duration,
    /// Send `{"action": "clear"}` to the relay on [`ChatSession::clear_history`].
    pub notify_clear: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            notify_clear: false,
        }
    }
}

impl ClientOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_notify_clear(mut self, notify_clear: bool) -> Self {
        self.notify_clear = notify_clear;
        self
    }
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    thread: Vec<Message>,
    failed: Option<Uuid>,
    in_flight: Option<CancellationToken>,
    /// Bumped on every clear so late replies for a discarded thread are dropped.
    generation: u64,
}

pub struct ChatSession<T> {
    transport: T,
    options: ClientOptions,
    inner: Mutex<Inner>,
    events: broadcast::Sender<SessionEvent>,
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ClientOptions::default())
    }

    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transport,
            options,
            inner: Mutex::new(Inner::default()),
            events,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the thread in display order.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().thread.clone()
    }

    pub fn session_id(&self) -> Option<String> {
        self.lock().state.session_id().map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_busy()
    }

    pub fn failed_message_id(&self) -> Option<Uuid> {
        self.lock().failed
    }

    /// Send one user message and wait for the assistant reply.
    ///
    /// Returns the appended assistant message. On failure the user message
    /// stays in the thread, flagged for [`retry`](Self::retry).
    pub async fn send(&self, text: &str) -> Result<Message, SendError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        let (user_message, request, token, generation) = {
            let mut inner = self.lock();
            if !inner.state.try_begin() {
                debug!("send rejected, another request is in flight");
                return Err(SendError::Busy);
            }
            inner.failed = None;

            let user_message = Message::user(content);
            let request = ChatRequest::new(content, inner.state.session_id().map(str::to_string));
            let token = CancellationToken::new();
            inner.in_flight = Some(token.clone());
            inner.thread.push(user_message.clone());

            (user_message, request, token, inner.generation)
        };

        self.emit(SessionEvent::MessageAppended(user_message.clone()));
        let _loading = LoadingGuard::start(self);

        debug!(
            message_id = %user_message.id,
            has_session = request.session_id.is_some(),
            "sending message"
        );

        let outcome = self.dispatch(&request, &token).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(message_id = %user_message.id, "thread cleared while sending, reply dropped");
            return Err(SendError::Cancelled);
        }

        match outcome {
            Ok(reply) => {
                let assistant = Message::assistant(reply.response);
                inner.state.adopt(reply.session_id);
                inner.thread.push(assistant.clone());
                drop(inner);

                info!(message_id = %assistant.id, "reply received");
                self.emit(SessionEvent::MessageAppended(assistant.clone()));
                Ok(assistant)
            }
            Err(SendError::Cancelled) => {
                drop(inner);
                info!(message_id = %user_message.id, "send cancelled");
                Err(SendError::Cancelled)
            }
            Err(e) => {
                inner.failed = Some(user_message.id);
                drop(inner);

                warn!(message_id = %user_message.id, error = %e, "failed to send message");
                self.emit(SessionEvent::Notice(Notice::error("Error", e.to_string())));
                Err(e)
            }
        }
    }

    /// Drop the flagged message and send `original_text` again as a new message.
    pub async fn retry(&self, original_text: &str) -> Result<Message, SendError> {
        let removed = {
            let mut inner = self.lock();
            if inner.state.is_busy() {
                return Err(SendError::Busy);
            }
            let removed = inner.failed.take();
            if let Some(id) = removed {
                inner.thread.retain(|m| m.id != id);
            }
            removed
        };

        if let Some(id) = removed {
            debug!(message_id = %id, "retrying failed message");
            self.emit(SessionEvent::MessageRemoved(id));
        }

        self.send(original_text).await
    }

    /// Forget the upstream session and empty the thread.
    ///
    /// Any in-flight send is cancelled and its reply discarded.
    pub async fn clear_history(&self) {
        let in_flight = {
            let mut inner = self.lock();
            inner.state.clear();
            inner.thread.clear();
            inner.failed = None;
            inner.generation += 1;
            inner.in_flight.take()
        };

        if let Some(token) = in_flight {
            token.cancel();
        }

        info!("chat history cleared");
        self.emit(SessionEvent::ThreadCleared);

        if self.options.notify_clear {
            match tokio::time::timeout(self.options.timeout, self.transport.clear()).await {
                Ok(Ok(())) => debug!("relay acknowledged clear"),
                Ok(Err(e)) => warn!(error = %e, "relay clear notification failed"),
                Err(_) => warn!("relay clear notification timed out"),
            }
        }

        self.emit(SessionEvent::Notice(Notice::info(
            "Chat cleared",
            "Your conversation history has been cleared.",
        )));
    }

    /// Cancel the in-flight send, if any. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        match self.lock().in_flight.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    async fn dispatch(
        &self,
        request: &ChatRequest,
        token: &CancellationToken,
    ) -> Result<ChatReply, SendError> {
        let timeout = self.options.timeout;
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(SendError::Cancelled),
            result = tokio::time::timeout(timeout, self.transport.send(request)) => match result {
                Ok(reply) => Ok(reply?),
                Err(_) => Err(SendError::Timeout(timeout)),
            },
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Holds the loading state for the duration of one send.
struct LoadingGuard<'a, T: ChatTransport> {
    session: &'a ChatSession<T>,
}

impl<'a, T: ChatTransport> LoadingGuard<'a, T> {
    fn start(session: &'a ChatSession<T>) -> Self {
        session.emit(SessionEvent::LoadingChanged(true));
        Self { session }
    }
}

impl<T: ChatTransport> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        {
            let mut inner = self.session.lock();
            inner.state.finish();
            inner.in_flight = None;
        }
        self.session.emit(SessionEvent::LoadingChanged(false));
    }
}
