//! relaychat-relay
//!
//! Stateless relay between browser chat clients and the Subfeed chat API.
//! Adds the service credential and entity id to each call so neither ever
//! reaches the browser.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::HeaderName;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod upstream;

use state::AppState;

/// Headers browsers may send on a cross-origin call.
const ALLOWED_HEADERS: [HeaderName; 4] = [
    AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    CONTENT_TYPE,
];

/// Build the relay router. CORS applies to every route, including the fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(ALLOWED_HEADERS);

    Router::new()
        .route("/", post(routes::chat::chat))
        .route("/chat", post(routes::chat::chat))
        .route("/health", get(routes::health::health_check))
        .fallback(routes::not_found)
        .layer(axum_mw::from_fn(middleware::request_log::request_log))
        .layer(cors)
        .with_state(state)
}
