//! Main application router.

use crate::{
    controllers::{health_controller, user_controller},
    middleware::{
        logging_middleware, rate_limit_middleware, request_id_header, ClientRateLimiter,
        SequentialRequestId,
    },
    state::AppState,
};
use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    routing::get,
    Router,
};
use keystone_config::ServerConfig;
use keystone_service::UserService;
use shaku::{HasComponent, Module};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Creates the main application router from a Shaku module.
pub fn create_router<M>(module: &M, server_config: &ServerConfig) -> Router
where
    M: Module + HasComponent<dyn UserService>,
{
    build_router(AppState::from_module(module), server_config)
}

/// Creates the main application router from an explicit state.
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let limiter = ClientRateLimiter::per_minute(server_config.rate_limit_per_minute);
    let api_router = Router::new()
        .nest("/users", user_controller::router())
        .with_state(state)
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/api/v1", api_router)
        .route("/", get(root))
        // Innermost first
        .layer(RequestBodyLimitLayer::new(server_config.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server_config.request_timeout(),
        ))
        .layer(create_cors_layer(server_config))
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            request_id_header(),
            SequentialRequestId::default(),
        ));

    info!(
        "Router created with user endpoints under /api/v1/users ({} requests/minute per client)",
        server_config.rate_limit_per_minute
    );
    router
}

/// Creates a CORS layer from the configured origins.
///
/// `*` allows any origin. Origins that are not valid header values are
/// skipped with a warning.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Keystone API v1"
}
