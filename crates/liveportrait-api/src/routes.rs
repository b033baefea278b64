//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use liveportrait_models::GENERATE_PATH;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::handlers::{generate, health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, payload_limit_errors, request_id, request_logging, security_headers,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let max_body_size = state.config.max_body_size;

    // The multipart extractor has its own 2MB default; lift it to the
    // configured ceiling so whole videos fit.
    let api_routes = Router::new()
        .route(GENERATE_PATH, post(generate))
        .layer(DefaultBodyLimit::max(max_body_size));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let mut router = Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(metrics_routes);

    // Example assets are served from the root so catalog paths resolve as-is.
    let assets_dir = &state.config.assets_dir;
    if assets_dir.is_dir() {
        info!(dir = %assets_dir.display(), "Serving example assets");
        router = router.fallback_service(ServeDir::new(assets_dir));
    } else {
        warn!(dir = %assets_dir.display(), "Assets directory not found, example assets disabled");
    }

    router
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(middleware::from_fn(payload_limit_errors))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
