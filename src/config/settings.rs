//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    #[serde(default = "default_provider_name")]
    pub default_provider: String,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Must stay above every provider `timeout_ms`
fn default_request_timeout() -> u64 {
    90
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_allow_origins")]
    pub allow_origins: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_allow_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_provider_name() -> String {
    "gemini".to_string()
}

/// Upstream provider family
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Claude,
    Mistral,
    Groq,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Gemini,
        ProviderKind::Claude,
        ProviderKind::Mistral,
        ProviderKind::Groq,
    ];

    /// Human readable name used in upstream error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Claude => "Claude",
            ProviderKind::Mistral => "Mistral",
            ProviderKind::Groq => "Groq",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::Claude => "https://api.anthropic.com",
            ProviderKind::Mistral => "https://api.mistral.ai/v1",
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Claude => "claude-3-5-sonnet-latest",
            ProviderKind::Mistral => "mistral-small-latest",
            ProviderKind::Groq => "llama-3.1-8b-instant",
        }
    }

    /// Environment variable holding the API key
    pub fn default_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Claude => "CLAUDE_API_KEY",
            ProviderKind::Mistral => "MISTRAL_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Claude => write!(f, "claude"),
            ProviderKind::Mistral => write!(f, "mistral"),
            ProviderKind::Groq => write!(f, "groq"),
        }
    }
}

/// API key source for a provider
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProviderAuth {
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub name: String,

    pub kind: ProviderKind,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub auth: ProviderAuth,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_timeout() -> u64 {
    60000
}

impl ProviderConfig {
    /// Configuration for `kind` with every field at its default
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            name: kind.to_string(),
            kind,
            enabled: true,
            endpoint: None,
            model: None,
            auth: ProviderAuth::default(),
            max_tokens: None,
            temperature: None,
            timeout_ms: default_timeout(),
        }
    }

    pub fn endpoint(&self) -> String {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.kind.default_endpoint())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.kind.default_model().to_string())
    }

    pub fn key_env(&self) -> String {
        self.auth
            .token_env
            .clone()
            .unwrap_or_else(|| self.kind.default_key_env().to_string())
    }

    /// Resolve the API key. Read on every call so a rotated key is picked up
    /// without a restart. Empty values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.auth
            .api_key
            .clone()
            .or_else(|| std::env::var(self.key_env()).ok())
            .filter(|key| !key.is_empty())
    }
}

impl Settings {
    /// Load settings from the default configuration file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/relay.yaml")
    }

    /// Load settings from a specific configuration file (YAML or TOML)
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_env_prefix(path, "PROMPT_RELAY")
    }

    /// Load settings, taking overrides from `<env_prefix>__SECTION__KEY`
    pub fn load_with_env_prefix<P: AsRef<Path>>(path: P, env_prefix: &str) -> Result<Self> {
        let path = path.as_ref();

        let format = if path.extension().map_or(false, |ext| ext == "yaml" || ext == "yml") {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let mut config_builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("server.request_timeout_secs", default_request_timeout() as i64)?
            .set_default("cors.enabled", true)?
            .set_default("cors.allow_origins", default_allow_origins())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("default_provider", default_provider_name())?;

        if path.exists() {
            config_builder = config_builder.add_source(File::from(path).format(format));
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = config_builder.build()?;
        let mut settings: Settings = config.try_deserialize()?;

        if settings.providers.is_empty() {
            settings.providers = Self::default_providers();
        }

        Ok(settings)
    }

    /// One provider per kind, named after the kind
    pub fn default_providers() -> Vec<ProviderConfig> {
        ProviderKind::ALL
            .iter()
            .map(|kind| ProviderConfig::for_kind(*kind))
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Unknown logging format '{}'",
                self.logging.format
            ))));
        }

        let request_timeout_ms = self.server.request_timeout_secs.saturating_mul(1000);
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if provider.name.is_empty() {
                return Err(AppError::Config(config::ConfigError::Message(
                    "Provider name cannot be empty".to_string(),
                )));
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(AppError::Config(config::ConfigError::Message(format!(
                    "Provider '{}' is configured more than once",
                    provider.name
                ))));
            }
            if provider.enabled && provider.timeout_ms >= request_timeout_ms {
                return Err(AppError::Config(config::ConfigError::Message(format!(
                    "Provider '{}' timeout_ms ({}) must be below server.request_timeout_secs ({} ms)",
                    provider.name, provider.timeout_ms, request_timeout_ms
                ))));
            }
        }

        if self.get_enabled_provider(&self.default_provider).is_none() {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Default provider '{}' is not an enabled provider",
                self.default_provider
            ))));
        }

        Ok(())
    }

    /// Get an enabled provider by name
    pub fn get_enabled_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.enabled && p.name == name)
    }

    /// Get enabled providers
    pub fn get_enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled).collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
            },
            cors: CorsConfig {
                enabled: true,
                allow_origins: default_allow_origins(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            default_provider: default_provider_name(),
            providers: Self::default_providers(),
        }
    }
}
