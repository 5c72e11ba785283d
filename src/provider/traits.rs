//! Provider traits and the request/response records shared by every dialect

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{AppError, Result};

/// A validated prompt, ready to be shaped into a provider payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub prompt: Option<String>,
    pub system_instruction: Option<String>,
}

impl PromptRequest {
    /// Build a request, treating empty strings as absent. At least one of
    /// the two fields must remain.
    pub fn new(prompt: Option<String>, system_instruction: Option<String>) -> Result<Self> {
        let prompt = prompt.filter(|p| !p.is_empty());
        let system_instruction = system_instruction.filter(|s| !s.is_empty());

        if prompt.is_none() && system_instruction.is_none() {
            return Err(AppError::MissingPrompt);
        }

        Ok(Self {
            prompt,
            system_instruction,
        })
    }

    /// The user turn; empty when only a system instruction was given
    pub fn prompt_text(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }
}

/// Result of a successful upstream call
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text, `None` when the upstream reply carried none
    pub text: Option<String>,
    /// The full upstream body
    pub raw: Value,
}

/// Whether a provider's API key is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    Present,
    Missing,
}

impl KeyStatus {
    pub fn of(config: &ProviderConfig) -> Self {
        if config.resolve_api_key().is_some() {
            KeyStatus::Present
        } else {
            KeyStatus::Missing
        }
    }
}

/// Provider status snapshot
#[derive(Debug, Clone)]
pub struct ProviderStatus {
    pub name: String,
    pub kind: ProviderKind,
    pub model: String,
    pub endpoint: String,
    pub key_env: String,
    pub key: KeyStatus,
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (the path segment it is routed under)
    fn name(&self) -> &str;

    fn kind(&self) -> ProviderKind;

    /// Name of the environment variable holding the API key
    fn key_env(&self) -> String;

    fn key_status(&self) -> KeyStatus;

    /// Send one prompt upstream and return the reply
    async fn generate(&self, request: &PromptRequest) -> Result<Completion>;

    /// Get status
    fn status(&self) -> ProviderStatus;
}

/// Provider-specific request and response shaping
pub trait Dialect: Send + Sync {
    /// Full URL of the generation endpoint
    fn url(&self, config: &ProviderConfig) -> String;

    /// Authentication and version headers
    fn headers(&self, api_key: &str) -> Result<HeaderMap>;

    fn payload(&self, config: &ProviderConfig, request: &PromptRequest) -> Value;

    /// Pull the generated text out of a successful reply
    fn extract_text(&self, body: &Value) -> Option<String>;

    /// Pull a human readable message out of an error reply
    fn error_message(&self, body: &Value) -> Option<String>;
}
