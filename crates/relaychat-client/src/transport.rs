//! Transport between the session client and the relay.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use relaychat_core::models::reply::{ChatReply, ErrorBody};
use relaychat_core::models::request::{ChatRequest, ClearRequest};
use serde::Serialize;
use serde_json::Value;

use crate::error::TransportError;

/// One round trip to the relay.
///
/// Implementations do not need their own timeout; [`ChatSession`] wraps
/// every call in one.
///
/// [`ChatSession`]: crate::session::ChatSession
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;

    /// Tell the relay the history was cleared.
    async fn clear(&self) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        (**self).send(request).await
    }

    async fn clear(&self) -> Result<(), TransportError> {
        (**self).clear().await
    }
}

/// JSON-over-HTTP transport to a deployed relay endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    endpoint: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: None,
            http,
        })
    }

    /// Key sent as both `Authorization: Bearer` and `apikey`, the pair a
    /// hosted function gateway expects from browser callers.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<B: Serialize + Sync>(&self, body: &B) -> Result<Value, TransportError> {
        let mut request = self.http.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), %message, "relay returned an error");
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        let body = self.post(request).await?;
        Ok(ChatReply::from_value(&body)?)
    }

    async fn clear(&self) -> Result<(), TransportError> {
        self.post(&ClearRequest::default()).await?;
        Ok(())
    }
}
