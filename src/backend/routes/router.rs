//! Router Configuration
//!
//! 1. `GET /ws` - presence socket
//! 2. `/api/*` - REST routes
//! 3. `/uploads/*` - uploaded files from the upload directory
//! 4. Fallback - JSON 404
//!
//! Wrapped in request tracing and CORS (localhost only unless
//! `cors_permissive` is set).

use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::realtime::presence_socket;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/ws", get(presence_socket));
    let router = configure_api_routes(router);
    let router = router.nest_service("/uploads", ServeDir::new(&app_state.config.upload_dir));
    let router = router.fallback(|| async {
        BackendError::handler(StatusCode::NOT_FOUND, "Not found")
    });

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&app_state.config));

    router.layer(middleware).with_state(app_state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }
    let local_origin = |port: u16| -> [HeaderValue; 2] {
        [
            format!("http://localhost:{}", port),
            format!("http://127.0.0.1:{}", port),
        ]
        .map(|origin| HeaderValue::from_str(&origin).unwrap_or(HeaderValue::from_static("null")))
    };
    let mut origins = Vec::new();
    origins.extend(local_origin(config.port));
    // Frontend dev server
    origins.extend(local_origin(5173));
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
