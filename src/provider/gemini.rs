//! Google Gemini `generateContent` dialect

use reqwest::header::{HeaderMap, HeaderName};
use serde_json::{json, Map, Value};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::provider::relay::secret_header;
use crate::provider::traits::{Dialect, PromptRequest};

pub struct GeminiDialect;

impl Dialect for GeminiDialect {
    fn url(&self, config: &ProviderConfig) -> String {
        format!("{}/models/{}:generateContent", config.endpoint(), config.model())
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-goog-api-key"), secret_header(api_key)?);
        Ok(headers)
    }

    fn payload(&self, config: &ProviderConfig, request: &PromptRequest) -> Value {
        let mut payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt_text() }],
            }],
        });

        if let Some(system) = &request.system_instruction {
            payload["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        let mut generation = Map::new();
        if let Some(max_tokens) = config.max_tokens {
            generation.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if let Some(temperature) = config.temperature {
            generation.insert("temperature".to_string(), json!(temperature));
        }
        if !generation.is_empty() {
            payload["generationConfig"] = Value::Object(generation);
        }

        payload
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn error_message(&self, body: &Value) -> Option<String> {
        body.pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
