//! Anthropic Claude Messages API dialect

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::provider::relay::secret_header;
use crate::provider::traits::{Dialect, PromptRequest};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API rejects requests without `max_tokens`
const DEFAULT_MAX_TOKENS: u32 = 1024;

pub struct ClaudeDialect;

impl Dialect for ClaudeDialect {
    fn url(&self, config: &ProviderConfig) -> String {
        format!("{}/v1/messages", config.endpoint())
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-api-key"), secret_header(api_key)?);
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }

    fn payload(&self, config: &ProviderConfig, request: &PromptRequest) -> Value {
        let mut payload = json!({
            "model": config.model(),
            "max_tokens": config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [{ "role": "user", "content": request.prompt_text() }],
        });

        if let Some(system) = &request.system_instruction {
            payload["system"] = json!(system);
        }
        if let Some(temperature) = config.temperature {
            payload["temperature"] = json!(temperature);
        }

        payload
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body.get("content")?
            .as_array()?
            .iter()
            .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn error_message(&self, body: &Value) -> Option<String> {
        body.pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
