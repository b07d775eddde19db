/**
 * Application State
 *
 * `AppState` is cloned into every handler. It holds the server
 * configuration, the optional database pool and the presence registry.
 * `FromRef` impls let handlers extract just the part they need.
 *
 * ```rust,ignore
 * async fn handler(State(pool): State<Option<PgPool>>) { ... }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::realtime::PresenceRegistry;
use crate::backend::server::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,

    /// `None` when the database is not configured or unreachable. Data
    /// handlers answer 503 in that case.
    pub db_pool: Option<PgPool>,

    /// Live presence sockets per user
    pub presence: PresenceRegistry,
}

impl AppState {
    pub fn new(config: ServerConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            config: Arc::new(config),
            db_pool,
            presence: PresenceRegistry::new(),
        }
    }

    /// The database pool, or 503
    pub fn pool(&self) -> BackendResult<&PgPool> {
        self.db_pool.as_ref().ok_or_else(BackendError::unavailable)
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for PresenceRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
