//! Client for the Subfeed entity chat endpoint.

use std::time::Duration;

use relaychat_core::models::request::UpstreamRequest;
use serde_json::Value;
use thiserror::Error;

use crate::config::RelayConfig;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Subfeed API Error: {status}")]
    Status { status: u16, body: String },

    #[error("Subfeed API timed out after {0:?}")]
    Timeout(Duration),

    #[error("Subfeed API request failed: {0}")]
    Transport(String),

    #[error("Subfeed API returned invalid JSON: {0}")]
    Decode(String),

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

/// Holds the credential and a pooled HTTP client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    config: RelayConfig,
    http: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| UpstreamError::Setup(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// POST one chat turn and return the upstream JSON untouched.
    pub async fn chat(&self, body: &UpstreamRequest) -> Result<Value, UpstreamError> {
        let url = self.config.chat_url();
        tracing::info!(url = %url, has_session = body.session_id.is_some(), "calling Subfeed API");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        tracing::info!(status = status.as_u16(), "Subfeed API response status");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Subfeed API error");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout(self.config.upstream_timeout)
        } else if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}
