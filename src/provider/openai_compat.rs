//! OpenAI compatible chat completions dialect (Mistral, Groq)

use reqwest::header::{HeaderMap, AUTHORIZATION};
use serde_json::{json, Value};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::provider::relay::secret_header;
use crate::provider::traits::{Dialect, PromptRequest};

pub struct OpenAiChatDialect;

impl Dialect for OpenAiChatDialect {
    fn url(&self, config: &ProviderConfig) -> String {
        format!("{}/chat/completions", config.endpoint())
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, secret_header(&format!("Bearer {}", api_key))?);
        Ok(headers)
    }

    fn payload(&self, config: &ProviderConfig, request: &PromptRequest) -> Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_instruction {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": request.prompt_text() }));

        let mut payload = json!({
            "model": config.model(),
            "messages": messages,
        });

        if let Some(max_tokens) = config.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = config.temperature {
            payload["temperature"] = json!(temperature);
        }

        payload
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn error_message(&self, body: &Value) -> Option<String> {
        // Groq nests the message under `error`, Mistral puts it at the top
        // level or in `detail`.
        body.pointer("/error/message")
            .or_else(|| body.get("message"))
            .or_else(|| body.get("detail"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
