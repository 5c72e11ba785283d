//! Error types and their HTTP response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("prompt or system instruction is required")]
    MissingPrompt,

    #[error("API key missing: {0} is not set")]
    MissingApiKey(String),

    #[error("unknown provider '{0}'")]
    ProviderNotFound(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("upstream returned {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        body: Value,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidJson(_) | AppError::MissingPrompt => StatusCode::BAD_REQUEST,
            AppError::ProviderNotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::MissingApiKey(_)
            | AppError::Config(_)
            | AppError::HttpClient(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = match self {
            AppError::InvalidJson(_) => json!({ "error": "Invalid JSON body" }),
            AppError::MissingPrompt => {
                json!({ "error": "Prompt or system instruction is required." })
            }
            AppError::MissingApiKey(_) => {
                json!({ "error": "Server misconfiguration: API key missing." })
            }
            AppError::ProviderNotFound(name) => {
                json!({ "error": format!("Unknown provider '{}'", name) })
            }
            AppError::MethodNotAllowed => json!({ "message": "Method Not Allowed" }),
            AppError::Upstream { message, body, .. } => {
                json!({ "error": message, "upstream": body })
            }
            AppError::HttpClient(e) => internal_body(e.to_string()),
            AppError::Config(e) => internal_body(e.to_string()),
            AppError::Internal(details) => internal_body(details),
        };

        (status, Json(body)).into_response()
    }
}

fn internal_body(details: String) -> Value {
    json!({
        "error": "An internal server error occurred on the backend.",
        "details": details,
    })
}
