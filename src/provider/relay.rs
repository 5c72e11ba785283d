//! Generic provider: one outbound HTTP call shaped by a [`Dialect`]

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{AppError, Result};
use crate::provider::traits::{
    Completion, Dialect, KeyStatus, LlmProvider, PromptRequest, ProviderStatus,
};

/// Provider backed by a single HTTP endpoint
pub struct RelayProvider<D: Dialect> {
    config: ProviderConfig,
    client: Client,
    dialect: D,
}

impl<D: Dialect> RelayProvider<D> {
    pub fn new(config: &ProviderConfig, dialect: D) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config: config.clone(),
            client,
            dialect,
        })
    }

    fn require_api_key(&self) -> Result<String> {
        self.config.resolve_api_key().ok_or_else(|| {
            let key_env = self.config.key_env();
            error!(provider = %self.config.name, key_env = %key_env, "API key is not set");
            AppError::MissingApiKey(key_env)
        })
    }
}

/// Parse an upstream body. Empty bodies become `{}`; bodies that are not JSON
/// are wrapped so the caller still sees what came back.
pub fn parse_body(raw: &str) -> Value {
    if raw.is_empty() {
        return json!({});
    }
    serde_json::from_str(raw).unwrap_or_else(|_| json!({ "parse_error": true, "raw": raw }))
}

#[async_trait]
impl<D: Dialect> LlmProvider for RelayProvider<D> {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn kind(&self) -> ProviderKind {
        self.config.kind
    }

    fn key_env(&self) -> String {
        self.config.key_env()
    }

    fn key_status(&self) -> KeyStatus {
        KeyStatus::of(&self.config)
    }

    async fn generate(&self, request: &PromptRequest) -> Result<Completion> {
        let api_key = self.require_api_key()?;

        let url = self.dialect.url(&self.config);
        let mut headers = self.dialect.headers(&api_key)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let payload = self.dialect.payload(&self.config, request);

        debug!(provider = %self.config.name, url = %url, "Sending generate request");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        let body = parse_body(&raw);

        if !status.is_success() {
            let message = self.dialect.error_message(&body).unwrap_or_else(|| {
                format!(
                    "An error occurred with the {} API.",
                    self.config.kind.display_name()
                )
            });
            error!(
                provider = %self.config.name,
                status = status.as_u16(),
                upstream = %body,
                "Upstream API error"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
                body,
            });
        }

        let text = self
            .dialect
            .extract_text(&body)
            .filter(|text| !text.is_empty());

        debug!(
            provider = %self.config.name,
            has_text = text.is_some(),
            "Generate request completed"
        );

        Ok(Completion { text, raw: body })
    }

    fn status(&self) -> ProviderStatus {
        ProviderStatus {
            name: self.config.name.clone(),
            kind: self.config.kind,
            model: self.config.model(),
            endpoint: self.config.endpoint(),
            key_env: self.config.key_env(),
            key: self.key_status(),
        }
    }
}

/// Build a header value from an API key
pub(crate) fn secret_header(api_key: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(api_key)
        .map_err(|_| AppError::Internal("API key contains invalid header characters".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
