/**
 * Follow and Like Handlers
 *
 * - `POST /api/follow/{id}` / `DELETE /api/follow/{id}` / `GET /api/follow/{id}/status`
 * - `POST /api/poems/{id}/like` / `DELETE /api/poems/{id}/like`
 *
 * All of these answer with the resulting status so the UI can update its
 * counters without a second request.
 */

use axum::extract::{Path, State};
use axum::response::Json;
use uuid::Uuid;

use crate::backend::auth::users::user_exists;
use crate::backend::content::db::poem_exists;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::social::db;
use crate::shared::social::{FollowStatus, LikeStatus};

pub async fn follow_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(target): Path<Uuid>,
) -> BackendResult<Json<FollowStatus>> {
    if caller == target {
        return Err(BackendError::bad_request("You cannot follow yourself"));
    }
    let pool = state.pool()?;
    if !user_exists(pool, target).await? {
        return Err(BackendError::not_found("User not found"));
    }
    db::follow(pool, caller, target).await?;
    tracing::debug!("{} follows {}", caller, target);
    Ok(Json(db::follow_status(pool, caller, target).await?))
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(target): Path<Uuid>,
) -> BackendResult<Json<FollowStatus>> {
    let pool = state.pool()?;
    if !user_exists(pool, target).await? {
        return Err(BackendError::not_found("User not found"));
    }
    db::unfollow(pool, caller, target).await?;
    Ok(Json(db::follow_status(pool, caller, target).await?))
}

pub async fn follow_status(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(target): Path<Uuid>,
) -> BackendResult<Json<FollowStatus>> {
    let pool = state.pool()?;
    if !user_exists(pool, target).await? {
        return Err(BackendError::not_found("User not found"));
    }
    Ok(Json(db::follow_status(pool, caller, target).await?))
}

pub async fn like_poem(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(poem_id): Path<Uuid>,
) -> BackendResult<Json<LikeStatus>> {
    let pool = state.pool()?;
    if !poem_exists(pool, poem_id).await? {
        return Err(BackendError::not_found("Poem not found"));
    }
    db::like_poem(pool, caller, poem_id).await?;
    Ok(Json(db::like_status(pool, caller, poem_id).await?))
}

pub async fn unlike_poem(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(poem_id): Path<Uuid>,
) -> BackendResult<Json<LikeStatus>> {
    let pool = state.pool()?;
    if !poem_exists(pool, poem_id).await? {
        return Err(BackendError::not_found("Poem not found"));
    }
    db::unlike_poem(pool, caller, poem_id).await?;
    Ok(Json(db::like_status(pool, caller, poem_id).await?))
}
