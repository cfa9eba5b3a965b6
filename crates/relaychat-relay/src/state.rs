use crate::error::ApiError;
use crate::upstream::UpstreamClient;

/// Shared application state, injected into all route handlers via Axum state.
///
/// `upstream` is `None` when the relay started without usable Subfeed
/// configuration; every chat request then fails with a configuration error.
#[derive(Clone, Default)]
pub struct AppState {
    pub upstream: Option<UpstreamClient>,
}

impl AppState {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream: Some(upstream),
        }
    }

    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn require_upstream(&self) -> Result<&UpstreamClient, ApiError> {
        self.upstream
            .as_ref()
            .ok_or_else(|| ApiError::Config("Subfeed API not configured".to_string()))
    }
}
