use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use relaychat_client::ClientOptions;

use crate::config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "relaychat", version, about = "Chat through a relaychat relay")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Connection flags. Each one overrides the saved config.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Relay endpoint URL.
    #[arg(long, env = "RELAYCHAT_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Key sent to the relay gateway.
    #[arg(long, env = "RELAYCHAT_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Seconds to wait for a reply.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Tell the relay when history is cleared.
    #[arg(long, global = true)]
    pub notify_clear: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive chat (the default).
    Chat,
    /// Send one message, print the reply and exit.
    Send {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Manage the saved config.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Print the saved config with the key redacted.
    Show,
    /// Save the connection flags as the new config.
    Save,
    /// Print where the config lives.
    Path,
}

/// Effective connection settings after layering flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub notify_clear: bool,
}

impl Settings {
    pub fn resolve(args: &ConnectionArgs, file: Option<&CliConfig>) -> eyre::Result<Self> {
        let endpoint = args
            .endpoint
            .clone()
            .or_else(|| file.map(|f| f.endpoint.clone()))
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                eyre::eyre!("no relay endpoint: pass --endpoint or run `relaychat config save`")
            })?;

        let api_key = args
            .api_key
            .clone()
            .or_else(|| file.and_then(|f| f.api_key.clone()));

        let timeout_secs = args
            .timeout_secs
            .or_else(|| file.map(|f| f.timeout_secs))
            .unwrap_or(ClientOptions::default().timeout.as_secs());

        Ok(Self {
            endpoint,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            notify_clear: args.notify_clear || file.is_some_and(|f| f.notify_clear),
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_timeout(self.timeout)
            .with_notify_clear(self.notify_clear)
    }

    pub fn to_config(&self) -> CliConfig {
        let mut config = CliConfig::new(self.endpoint.clone());
        config.api_key = self.api_key.clone();
        config.timeout_secs = self.timeout.as_secs();
        config.notify_clear = self.notify_clear;
        config
    }
}
