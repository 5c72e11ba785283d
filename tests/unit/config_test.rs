//! Unit tests for configuration module

use prompt_relay::config::{ProviderKind, Settings};
use std::io::Write;

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.request_timeout_secs, 90);
    assert!(settings.cors.enabled);
    assert_eq!(settings.cors.allow_origins, vec!["*".to_string()]);
    assert_eq!(settings.logging.format, "json");
}

#[test]
fn test_missing_file_uses_defaults_with_all_providers() {
    let settings = Settings::load_from_path("does/not/exist.yaml").unwrap();

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.default_provider, "gemini");
    let kinds: Vec<_> = settings.providers.iter().map(|p| p.kind).collect();
    assert_eq!(kinds, ProviderKind::ALL.to_vec());
    assert!(settings.validate().is_ok());
}

#[test]
fn test_load_yaml_file() {
    let file = write_config(
        ".yaml",
        r#"
server:
  port: 9090
default_provider: fast
providers:
  - name: fast
    kind: groq
    model: llama-3.3-70b-versatile
    temperature: 0.2
  - name: claude
    kind: claude
    enabled: false
    auth:
      token_env: ANTHROPIC_API_KEY
"#,
    );

    let settings = Settings::load_from_path(file.path()).unwrap();

    assert_eq!(settings.server.port, 9090);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.default_provider, "fast");
    assert_eq!(settings.providers.len(), 2);

    let fast = &settings.providers[0];
    assert_eq!(fast.kind, ProviderKind::Groq);
    assert_eq!(fast.model(), "llama-3.3-70b-versatile");
    assert_eq!(fast.endpoint(), "https://api.groq.com/openai/v1");
    assert_eq!(fast.key_env(), "GROQ_API_KEY");
    assert_eq!(fast.timeout_ms, 60000);

    let claude = &settings.providers[1];
    assert!(!claude.enabled);
    assert_eq!(claude.key_env(), "ANTHROPIC_API_KEY");

    assert!(settings.validate().is_ok());
    assert_eq!(settings.get_enabled_providers().len(), 1);
}

#[test]
fn test_load_toml_file() {
    let file = write_config(
        ".toml",
        r#"
default_provider = "mistral"

[server]
port = 7000

[[providers]]
name = "mistral"
kind = "mistral"
max_tokens = 512
"#,
    );

    let settings = Settings::load_from_path(file.path()).unwrap();

    assert_eq!(settings.server.port, 7000);
    assert_eq!(settings.providers.len(), 1);
    assert_eq!(settings.providers[0].max_tokens, Some(512));
    assert!(settings.validate().is_ok());
}

#[test]
fn test_environment_override() {
    // Own prefix so concurrent loads in this binary never see the override
    std::env::set_var("RELAY_ENV_OVERRIDE_TEST__LOGGING__LEVEL", "debug");
    std::env::set_var("RELAY_ENV_OVERRIDE_TEST__SERVER__PORT", "9191");
    let settings =
        Settings::load_with_env_prefix("does/not/exist.yaml", "RELAY_ENV_OVERRIDE_TEST").unwrap();
    std::env::remove_var("RELAY_ENV_OVERRIDE_TEST__LOGGING__LEVEL");
    std::env::remove_var("RELAY_ENV_OVERRIDE_TEST__SERVER__PORT");

    assert_eq!(settings.logging.level, "debug");
    assert_eq!(settings.server.port, 9191);
}

#[test]
fn test_unknown_provider_kind_fails_to_load() {
    let file = write_config(
        ".yaml",
        r#"
providers:
  - name: local
    kind: ollama
"#,
    );

    assert!(Settings::load_from_path(file.path()).is_err());
}

#[test]
fn test_settings_validation_invalid_port() {
    let mut settings = Settings::default();
    settings.server.port = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_empty_provider_name() {
    let mut settings = Settings::default();
    settings.providers[1].name = String::new();

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_unknown_default_provider() {
    let mut settings = Settings::default();
    settings.default_provider = "openai".to_string();

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_logging_format() {
    let mut settings = Settings::default();
    settings.logging.format = "xml".to_string();

    assert!(settings.validate().is_err());
}
