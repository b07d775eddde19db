/**
 * Current User Handler
 *
 * `GET /api/auth/me`
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::auth::UserResponse;

pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> BackendResult<Json<UserResponse>> {
    let pool = state.pool()?;
    let user = get_user_by_id(pool, user_id).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", user_id);
        BackendError::not_found("User not found")
    })?;
    Ok(Json(user.into()))
}
