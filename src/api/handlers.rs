//! HTTP request handlers

use crate::api::models::{
    ErrorResponse, GenerateRequest, GenerateResponse, HealthResponse, ProviderInfo,
    ProviderListResponse,
};
use crate::error::AppError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Generate text with the default provider
#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "Generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "Invalid body or missing prompt", body = ErrorResponse),
        (status = 500, description = "API key missing or internal failure", body = ErrorResponse),
    )
)]
pub async fn generate_default(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, AppError> {
    let span = info_span!(
        "generate",
        request_id = %Uuid::new_v4(),
        provider = %state.providers.default_provider_name()
    );
    generate_with(&state, None, &body).instrument(span).await
}

/// Generate text with a named provider
#[utoipa::path(
    post,
    path = "/api/{provider}/generate",
    tag = "Generate",
    params(("provider" = String, Path, description = "Provider name, e.g. gemini or claude")),
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "Invalid body or missing prompt", body = ErrorResponse),
        (status = 404, description = "Unknown provider", body = ErrorResponse),
        (status = 500, description = "API key missing or internal failure", body = ErrorResponse),
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, AppError> {
    let span = info_span!("generate", request_id = %Uuid::new_v4(), provider = %provider);
    generate_with(&state, Some(&provider), &body)
        .instrument(span)
        .await
}

async fn generate_with(
    state: &AppState,
    provider: Option<&str>,
    body: &[u8],
) -> Result<Json<GenerateResponse>, AppError> {
    let request = GenerateRequest::from_body(body)?.into_prompt()?;

    let provider = match provider {
        Some(name) => state.providers.get(name)?,
        None => state.providers.default_provider()?,
    };

    info!(
        provider = %provider.name(),
        prompt_len = request.prompt_text().len(),
        has_system_instruction = request.system_instruction.is_some(),
        "Received generate request"
    );

    let completion = provider.generate(&request).await?;

    let response = match completion.text {
        Some(text) => {
            info!(text_len = text.len(), "Generate request completed");
            GenerateResponse { text, raw: None }
        }
        None => {
            warn!("Provider reply carried no text, returning raw body");
            GenerateResponse {
                text: String::new(),
                raw: Some(completion.raw),
            }
        }
    };

    Ok(Json(response))
}

/// API key presence for every provider
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Key presence report", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        env: state.providers.key_report(),
    })
}

/// API key presence for one provider
#[utoipa::path(
    get,
    path = "/api/{provider}/health",
    tag = "Health",
    params(("provider" = String, Path, description = "Provider name")),
    responses(
        (status = 200, description = "Key presence report", body = HealthResponse),
        (status = 404, description = "Unknown provider", body = ErrorResponse),
    )
)]
pub async fn provider_health(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<Json<HealthResponse>, AppError> {
    let provider = state.providers.get(&provider)?;

    Ok(Json(HealthResponse {
        ok: true,
        env: BTreeMap::from([(provider.key_env(), provider.key_status())]),
    }))
}

/// List configured providers
#[utoipa::path(
    get,
    path = "/api/providers",
    tag = "Providers",
    responses((status = 200, description = "Configured providers", body = ProviderListResponse))
)]
pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ProviderListResponse> {
    let providers: Vec<ProviderInfo> = state
        .providers
        .list()
        .into_iter()
        .map(ProviderInfo::from)
        .collect();

    Json(ProviderListResponse {
        default: state.providers.default_provider_name().to_string(),
        providers,
    })
}

/// Fallback for unsupported methods on known paths
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
