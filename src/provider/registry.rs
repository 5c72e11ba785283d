//! Provider registry for looking up LLM providers by name

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::config::{ProviderConfig, ProviderKind, Settings};
use crate::error::{AppError, Result};
use crate::provider::claude::ClaudeDialect;
use crate::provider::gemini::GeminiDialect;
use crate::provider::openai_compat::OpenAiChatDialect;
use crate::provider::relay::RelayProvider;
use crate::provider::traits::{KeyStatus, LlmProvider, ProviderStatus};

/// Create the provider matching the configured kind
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    match config.kind {
        ProviderKind::Gemini => Ok(Arc::new(RelayProvider::new(config, GeminiDialect)?)),
        ProviderKind::Claude => Ok(Arc::new(RelayProvider::new(config, ClaudeDialect)?)),
        ProviderKind::Mistral | ProviderKind::Groq => {
            Ok(Arc::new(RelayProvider::new(config, OpenAiChatDialect)?))
        }
    }
}

/// Registry of enabled providers
pub struct ProviderRegistry {
    providers: DashMap<String, Arc<dyn LlmProvider>>,
    default_provider: String,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: DashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Build the registry from settings, skipping disabled providers
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let registry = Self::new(settings.default_provider.clone());

        for config in &settings.providers {
            if !config.enabled {
                info!(name = %config.name, "Skipping disabled provider");
                continue;
            }
            registry.add_provider(create_provider(config)?)?;
        }

        Ok(registry)
    }

    /// Register a provider under its own name
    pub fn add_provider(&self, provider: Arc<dyn LlmProvider>) -> Result<()> {
        let name = provider.name().to_string();
        if self.providers.contains_key(&name) {
            return Err(AppError::Internal(format!(
                "Provider '{}' already exists",
                name
            )));
        }

        info!(name = %name, kind = %provider.kind(), "Registered provider");
        self.providers.insert(name, provider);
        Ok(())
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn LlmProvider>> {
        self.providers
            .get(name)
            .map(|p| p.value().clone())
            .ok_or_else(|| AppError::ProviderNotFound(name.to_string()))
    }

    pub fn default_provider(&self) -> Result<Arc<dyn LlmProvider>> {
        self.get(&self.default_provider)
    }

    pub fn default_provider_name(&self) -> &str {
        &self.default_provider
    }

    /// List all providers, sorted by name
    pub fn list(&self) -> Vec<ProviderStatus> {
        let mut statuses: Vec<_> = self
            .providers
            .iter()
            .map(|entry| entry.value().status())
            .collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        statuses
    }

    /// Key presence per key environment variable
    pub fn key_report(&self) -> BTreeMap<String, KeyStatus> {
        self.providers
            .iter()
            .map(|entry| (entry.value().key_env(), entry.value().key_status()))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
