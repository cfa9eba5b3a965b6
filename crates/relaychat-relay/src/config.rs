use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.subfeed.app";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Message is what callers see; the variable names only go to the log.
    #[error("Subfeed API not configured")]
    Missing { vars: Vec<&'static str> },

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Relay settings, read from the process environment.
///
/// | variable | required | default |
/// |---|---|---|
/// | `SUBFEED_API_KEY` | yes | |
/// | `SUBFEED_ENTITY_ID` | yes | |
/// | `SUBFEED_API_BASE` | no | `https://api.subfeed.app` |
/// | `RELAY_UPSTREAM_TIMEOUT_SECS` | no | 60 |
#[derive(Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub entity_id: String,
    pub api_base: String,
    pub upstream_timeout: Duration,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"[REDACTED]")
            .field("entity_id", &self.entity_id)
            .field("api_base", &self.api_base)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl RelayConfig {
    pub fn new(api_key: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            entity_id: entity_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("SUBFEED_API_KEY");
        let entity_id = get("SUBFEED_ENTITY_ID");

        let (api_key, entity_id) = match (api_key, entity_id) {
            (Some(key), Some(entity)) => (key, entity),
            (key, entity) => {
                let mut vars = Vec::new();
                if key.is_none() {
                    vars.push("SUBFEED_API_KEY");
                }
                if entity.is_none() {
                    vars.push("SUBFEED_ENTITY_ID");
                }
                return Err(ConfigError::Missing { vars });
            }
        };

        let mut config = Self::new(api_key, entity_id);

        if let Some(base) = get("SUBFEED_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get("RELAY_UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "RELAY_UPSTREAM_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.upstream_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Entity-scoped chat endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/v1/entity/{}/chat", self.api_base, self.entity_id)
    }
}
