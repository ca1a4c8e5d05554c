use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::shared::{AppError, AppState};
use crate::websockets::websocket_handler;

/// Build the router: relay endpoint, health check, CORS and request tracing
pub fn create_router(state: AppState, config: &RelayConfig) -> Result<Router, AppError> {
    Ok(Router::new()
        .route("/", get(websocket_handler))
        .route("/health", get(health_check))
        .layer(cors_layer(&config.allowed_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(allowed_origin).map_err(|e| {
        AppError::InvalidConfig(format!(
            "ALLOWED_ORIGIN '{}' is not a valid origin: {}",
            allowed_origin, e
        ))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
