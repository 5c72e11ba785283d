//! API request and response models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::provider::{KeyStatus, PromptRequest, ProviderStatus};

/// Generate request
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// User prompt
    #[serde(default)]
    pub prompt: Option<String>,

    /// Optional behavioural directive for the model
    #[serde(default)]
    pub system_instruction: Option<String>,
}

impl GenerateRequest {
    /// Parse a raw request body. An empty body, or JSON that is not an
    /// object, yields an empty request so that validation reports the
    /// missing prompt.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|e| AppError::InvalidJson(e.to_string()))?;

        if !value.is_object() {
            return Ok(Self::default());
        }

        serde_json::from_value(value).map_err(|e| AppError::InvalidJson(e.to_string()))
    }

    /// Validate into a provider request
    pub fn into_prompt(self) -> Result<PromptRequest> {
        PromptRequest::new(self.prompt, self.system_instruction)
    }
}

/// Generate response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Generated text, empty when the provider returned none
    pub text: String,

    /// Full upstream body, only present when `text` is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub raw: Option<Value>,
}

/// Error body
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,

    /// Upstream error body, for provider failures
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub upstream: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    /// Key presence per environment variable name
    pub env: BTreeMap<String, KeyStatus>,
}

/// Provider information for the listing endpoint
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub name: String,
    pub kind: String,
    pub model: String,
    pub endpoint: String,
    pub key_env: String,
    pub key: KeyStatus,
}

impl From<ProviderStatus> for ProviderInfo {
    fn from(status: ProviderStatus) -> Self {
        Self {
            name: status.name,
            kind: status.kind.to_string(),
            model: status.model,
            endpoint: status.endpoint,
            key_env: status.key_env,
            key: status.key,
        }
    }
}

/// Provider list response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ProviderListResponse {
    pub default: String,
    pub providers: Vec<ProviderInfo>,
}
