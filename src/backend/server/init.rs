/**
 * Server Initialization
 *
 * 1. Connect to the database (optional) and run migrations
 * 2. Make sure the upload directory exists
 * 3. Build the application state and router
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create the application for `config`
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing Quillnest backend server");

    let db_pool = load_database(&config).await;

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
        tracing::error!(
            "[Upload] Failed to create upload directory {}: {}",
            config.upload_dir.display(),
            e
        );
    }

    let app_state = AppState::new(config, db_pool);
    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}
