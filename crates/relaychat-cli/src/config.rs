use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
const CURRENT_VERSION: u32 = 1;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Relay URL, e.g. `https://<project>.supabase.co/functions/v1/chat`.
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub notify_clear: bool,
    pub created_at: jiff::Timestamp,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl CliConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            endpoint: endpoint.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            notify_clear: false,
            created_at: jiff::Timestamp::now(),
        }
    }
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigInfo {
    pub endpoint: String,
    pub api_key_hint: Option<String>,
    pub timeout_secs: u64,
    pub notify_clear: bool,
    pub created_at: String,
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("relaychat"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn load_config() -> eyre::Result<Option<CliConfig>> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

pub fn load_config_from(path: &Path) -> eyre::Result<CliConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    if on_disk_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {on_disk_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update relaychat."
        ));
    }

    let config: CliConfig = serde_json::from_value(json)?;
    Ok(config)
}

pub fn save_config(config: &CliConfig) -> eyre::Result<PathBuf> {
    let path = config_path()?;
    save_config_to(config, &path)?;
    Ok(path)
}

pub fn save_config_to(config: &CliConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file may hold an API key
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn config_info(config: &CliConfig) -> ConfigInfo {
    ConfigInfo {
        endpoint: config.endpoint.clone(),
        api_key_hint: config.api_key.as_deref().map(redact_key),
        timeout_secs: config.timeout_secs,
        notify_clear: config.notify_clear,
        created_at: config.created_at.to_string(),
    }
}

fn redact_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
