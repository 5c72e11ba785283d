//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::*;
use crate::config::CorsConfig;
use crate::provider::KeyStatus;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prompt Relay API",
        version = "0.1.0",
        description = "Forwards prompts to hosted LLM providers and returns the generated text.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        handlers::generate_default,
        handlers::generate,
        handlers::health_check,
        handlers::provider_health,
        handlers::list_providers,
    ),
    components(schemas(
        GenerateRequest,
        GenerateResponse,
        ErrorResponse,
        HealthResponse,
        ProviderInfo,
        ProviderListResponse,
        KeyStatus,
    )),
    tags(
        (name = "Generate", description = "Prompt forwarding endpoints"),
        (name = "Health", description = "API key presence checks"),
        (name = "Providers", description = "Provider listing"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    let cors = state.settings.cors.clone();
    let request_timeout = Duration::from_secs(state.settings.server.request_timeout_secs);

    let api_routes = Router::new()
        .route(
            "/generate",
            post(handlers::generate_default).fallback(handlers::method_not_allowed),
        )
        .route(
            "/:provider/generate",
            post(handlers::generate).fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/:provider/health",
            get(handlers::provider_health).fallback(handlers::method_not_allowed),
        )
        .route(
            "/providers",
            get(handlers::list_providers).fallback(handlers::method_not_allowed),
        );

    let router = Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http());

    if cors.enabled {
        router.layer(cors_layer(&cors))
    } else {
        router
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allow_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.allow_origins.iter().filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
