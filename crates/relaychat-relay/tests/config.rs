use std::collections::HashMap;
use std::time::Duration;

use relaychat_relay::config::{ConfigError, RelayConfig, DEFAULT_API_BASE};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn required_values_with_defaults() {
    let config = RelayConfig::from_lookup(lookup(&[
        ("SUBFEED_API_KEY", "key"),
        ("SUBFEED_ENTITY_ID", "ent"),
    ]))
    .unwrap();

    assert_eq!(config.api_key, "key");
    assert_eq!(config.entity_id, "ent");
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert_eq!(config.upstream_timeout, Duration::from_secs(60));
    assert_eq!(config.chat_url(), "https://api.subfeed.app/v1/entity/ent/chat");
}

#[test]
fn missing_values_are_listed() {
    let err = RelayConfig::from_lookup(lookup(&[("SUBFEED_ENTITY_ID", "ent")])).unwrap_err();
    match err {
        ConfigError::Missing { vars } => assert_eq!(vars, vec!["SUBFEED_API_KEY"]),
        other => panic!("unexpected: {other:?}"),
    }

    let err = RelayConfig::from_lookup(lookup(&[])).unwrap_err();
    assert_eq!(err.to_string(), "Subfeed API not configured");
}

#[test]
fn blank_values_count_as_missing() {
    let err = RelayConfig::from_lookup(lookup(&[
        ("SUBFEED_API_KEY", "  "),
        ("SUBFEED_ENTITY_ID", "ent"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Missing { .. }));
}

#[test]
fn optional_overrides() {
    let config = RelayConfig::from_lookup(lookup(&[
        ("SUBFEED_API_KEY", "key"),
        ("SUBFEED_ENTITY_ID", "ent"),
        ("SUBFEED_API_BASE", "http://localhost:9000/"),
        ("RELAY_UPSTREAM_TIMEOUT_SECS", "15"),
    ]))
    .unwrap();

    assert_eq!(config.chat_url(), "http://localhost:9000/v1/entity/ent/chat");
    assert_eq!(config.upstream_timeout, Duration::from_secs(15));
}

#[test]
fn bad_timeout_is_rejected() {
    let err = RelayConfig::from_lookup(lookup(&[
        ("SUBFEED_API_KEY", "key"),
        ("SUBFEED_ENTITY_ID", "ent"),
        ("RELAY_UPSTREAM_TIMEOUT_SECS", "soon"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "RELAY_UPSTREAM_TIMEOUT_SECS", .. }));
}

#[test]
fn debug_redacts_api_key() {
    let config = RelayConfig::new("very-secret", "ent");
    let debug = format!("{config:?}");
    assert!(!debug.contains("very-secret"));
    assert!(debug.contains("ent"));
}
