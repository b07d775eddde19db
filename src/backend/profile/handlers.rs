/**
 * Profile Handlers
 *
 * - `GET /api/users/{id}` - profile with follow counts
 * - `PUT /api/users/{id}` - update display name / bio (self only)
 * - `GET /api/users/{id}/followers`
 * - `GET /api/users/{id}/following`
 */

use axum::extract::{Path, Query, State};
use axum::response::Json;
use uuid::Uuid;

use crate::backend::auth::users::{update_profile as update_user_profile, user_exists};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::profile::db;
use crate::backend::server::state::AppState;
use crate::shared::content::PageQuery;
use crate::shared::social::{UpdateProfileRequest, UserProfile, UserSummary};

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> BackendResult<Json<UserProfile>> {
    let pool = state.pool()?;
    db::get_profile(pool, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("User not found"))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> BackendResult<Json<UserProfile>> {
    if caller != user_id {
        tracing::warn!("{} tried to edit the profile of {}", caller, user_id);
        return Err(BackendError::forbidden("You can only edit your own profile"));
    }
    request.validate()?;
    let pool = state.pool()?;

    let display_name = request.display_name.as_deref().map(str::trim);
    let bio = request.bio.as_deref().map(str::trim);
    update_user_profile(pool, user_id, display_name, bio)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    db::get_profile(pool, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("User not found"))
}

pub async fn list_followers(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<Vec<UserSummary>>> {
    let pool = state.pool()?;
    if !user_exists(pool, user_id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    let (limit, offset) = page.limit_offset();
    Ok(Json(db::list_followers(pool, user_id, limit, offset).await?))
}

pub async fn list_following(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<Vec<UserSummary>>> {
    let pool = state.pool()?;
    if !user_exists(pool, user_id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    let (limit, offset) = page.limit_offset();
    Ok(Json(db::list_following(pool, user_id, limit, offset).await?))
}
