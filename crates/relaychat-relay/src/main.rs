use std::env;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use relaychat_relay::config::RelayConfig;
use relaychat_relay::state::AppState;
use relaychat_relay::upstream::UpstreamClient;

const DEFAULT_ADDR: &str = "0.0.0.0:8787";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // A missing credential must not stop the relay from answering: every
    // request gets a configuration error envelope instead.
    let state = match RelayConfig::from_env() {
        Ok(config) => {
            tracing::info!(?config, "relay configured");
            AppState::new(UpstreamClient::new(config)?)
        }
        Err(e) => {
            tracing::error!(error = ?e, "missing Subfeed configuration");
            AppState::unconfigured()
        }
    };

    let app = relaychat_relay::app(state);

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let addr = env::var("RELAY_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "relaychat-relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
