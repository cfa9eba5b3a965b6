use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use relaychat_cli::args::{Cli, Command, ConfigCommand, Settings};
use relaychat_cli::{config, repl};
use relaychat_client::{ChatSession, HttpTransport};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let saved = config::load_config()?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let settings = Settings::resolve(&cli.connection, saved.as_ref())?;
            let session = build_session(&settings)?;
            repl::run(&session).await
        }
        Command::Send { text } => {
            let settings = Settings::resolve(&cli.connection, saved.as_ref())?;
            let session = build_session(&settings)?;
            let reply = session.send(&text.join(" ")).await?;
            println!("{}", reply.content);
            if let Some(id) = session.session_id() {
                tracing::info!(session_id = %id, "session");
            }
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigCommand::Path => {
                println!("{}", config::config_path()?.display());
                Ok(())
            }
            ConfigCommand::Show => {
                let saved = saved.ok_or_else(|| eyre::eyre!("no saved config"))?;
                let info = config::config_info(&saved);
                println!("{}", serde_json::to_string_pretty(&info)?);
                Ok(())
            }
            ConfigCommand::Save => {
                let settings = Settings::resolve(&cli.connection, saved.as_ref())?;
                let path = config::save_config(&settings.to_config())?;
                println!("saved {}", path.display());
                Ok(())
            }
        },
    }
}

fn build_session(settings: &Settings) -> Result<ChatSession<HttpTransport>> {
    let mut transport = HttpTransport::new(settings.endpoint.clone())?;
    if let Some(key) = &settings.api_key {
        transport = transport.with_api_key(key.clone());
    }
    Ok(ChatSession::with_options(transport, settings.client_options()))
}
