//! Integration tests for configuration module

use std::time::Duration;
use urlgate_core::{Config, Error, UrlPolicy};

const SAMPLE: &str = r#"
[filter]
allow = "^https?://"
deny = "\\.(exe|msi)$"
timeout_ms = 1500

[adblock]
enabled = true
tokens = ["ads", "tracker"]

[engine]
backtrack_limit = 50000
max_cached_patterns = 16
"#;

#[test]
fn test_config_from_toml() {
    let config = Config::from_toml(SAMPLE).expect("Failed to parse");

    assert_eq!(config.filter.allow, "^https?://");
    assert_eq!(config.filter.deny, r"\.(exe|msi)$");
    assert_eq!(config.filter.timeout(), Duration::from_millis(1500));
    assert!(config.adblock.enabled);
    assert_eq!(config.adblock.tokens, vec!["ads", "tracker"]);
    assert_eq!(config.engine.backtrack_limit, 50_000);
    assert_eq!(config.engine.max_cached_patterns, 16);
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_serialization_roundtrip() {
    let original = Config::from_toml(SAMPLE).unwrap();

    let toml_str = original.to_toml().expect("Failed to serialize");
    let parsed = Config::from_toml(&toml_str).expect("Failed to parse");

    assert_eq!(original.filter.allow, parsed.filter.allow);
    assert_eq!(original.filter.deny, parsed.filter.deny);
    assert_eq!(original.adblock.tokens, parsed.adblock.tokens);
    assert_eq!(original.engine.backtrack_limit, parsed.engine.backtrack_limit);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("urlgate.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.filter.timeout_ms, 1500);
}

#[test]
fn test_load_missing_file() {
    let result = Config::load("/definitely/not/here/urlgate.toml");
    assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
}

#[test]
fn test_load_unreadable_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    // Exists, but reading a directory fails with something other than NotFound
    let result = Config::load(dir.path());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_invalid_toml() {
    let result = Config::from_toml("[filter]\ntimeout_ms = \"soon\"\n");
    assert!(matches!(result, Err(Error::TomlParse(_))));
}

#[test]
fn test_adblock_tokens_merge_file() {
    let dir = tempfile::tempdir().unwrap();
    let tokens_path = dir.path().join("blocked.txt");
    std::fs::write(&tokens_path, "# extra\ndoubleclick\n").unwrap();

    let mut config = Config::from_toml(SAMPLE).unwrap();
    config.adblock.file = Some(tokens_path);

    assert!(config.validate().is_ok());
    assert_eq!(
        config.adblock_tokens().unwrap(),
        vec!["ads", "tracker", "doubleclick"]
    );
}

#[test]
fn test_missing_token_file_rejected() {
    let mut config = Config::from_toml(SAMPLE).unwrap();
    config.adblock.file = Some("/definitely/not/here/blocked.txt".into());

    assert!(matches!(config.validate(), Err(Error::BlockList { .. })));
    assert!(UrlPolicy::from_config(&config).is_err());
}

#[test]
fn test_policy_from_sample() {
    let config = Config::from_toml(SAMPLE).unwrap();
    let policy = UrlPolicy::from_config(&config).unwrap();

    assert!(policy.evaluate("https://example.com/").is_ok());
    assert!(policy.evaluate("https://example.com/setup.msi").unwrap_err().is_filtered());
    assert!(policy.evaluate("https://example.com/ads/x").unwrap_err().is_filtered());
    assert!(policy.evaluate("gopher://example.com/").unwrap_err().is_filtered());
}
