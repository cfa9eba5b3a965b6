use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relaychat_core::models::reply::ClearAck;
use relaychat_core::models::request::RelayRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// Relay one chat turn to Subfeed, or acknowledge a clear.
///
/// The upstream JSON is returned exactly as received. Configuration is
/// checked before the body is even read, so an unconfigured relay rejects
/// clears too.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let upstream = state.require_upstream()?;

    let request: RelayRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RelayRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    tracing::info!(
        has_message = request.message.is_some(),
        has_session = request.session_id.is_some(),
        action = request.action.as_deref().unwrap_or(""),
        "received request"
    );

    if request.is_clear() {
        tracing::info!("clearing session");
        return Ok(Json(ClearAck::default()).into_response());
    }

    let upstream_request = request
        .to_upstream()
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;

    let data = upstream.chat(&upstream_request).await?;
    Ok(Json(data).into_response())
}
