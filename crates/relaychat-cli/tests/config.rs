use relaychat_cli::config::{config_info, load_config_from, save_config_to, CliConfig};

#[test]
fn save_then_load_keeps_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = CliConfig::new("https://relay.example.com/chat");
    config.api_key = Some("anon-key-1234567890".to_string());
    config.timeout_secs = 30;
    config.notify_clear = true;

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert_eq!(loaded, config);
    assert!(!path.with_extension("json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    save_config_to(&CliConfig::new("https://relay.example.com"), &path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn missing_optional_fields_get_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "endpoint": "https://relay.example.com", "created_at": "2025-01-01T00:00:00Z" }"#,
    )
    .unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.config_version, 0);
    assert_eq!(loaded.timeout_secs, 60);
    assert_eq!(loaded.api_key, None);
    assert!(!loaded.notify_clear);
}

#[test]
fn newer_config_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "config_version": 9, "endpoint": "x", "created_at": "2025-01-01T00:00:00Z" }"#,
    )
    .unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn info_redacts_api_key() {
    let mut config = CliConfig::new("https://relay.example.com");
    config.api_key = Some("abcd-secret-middle-wxyz".to_string());
    let info = config_info(&config);
    assert_eq!(info.api_key_hint.as_deref(), Some("abcd...wxyz"));

    config.api_key = Some("short".to_string());
    assert_eq!(config_info(&config).api_key_hint.as_deref(), Some("****"));
}
