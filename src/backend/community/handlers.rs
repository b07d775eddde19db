/**
 * Community Handlers
 *
 * - `GET /api/communities`, `POST /api/communities`, `GET /api/communities/{id}`
 * - `POST /api/communities/{id}/members` - join
 * - `DELETE /api/communities/{id}/members` - leave (not allowed for the owner)
 */

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::backend::community::db;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::content::{Community, MembershipStatus, NewCommunity, PageQuery};

pub async fn list_communities(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<Vec<Community>>> {
    let pool = state.pool()?;
    let (limit, offset) = page.limit_offset();
    Ok(Json(db::list_communities(pool, limit, offset).await?))
}

pub async fn get_community(
    State(state): State<AppState>,
    Path(community_id): Path<Uuid>,
) -> BackendResult<Json<Community>> {
    let pool = state.pool()?;
    db::get_community(pool, community_id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Community not found"))
}

pub async fn create_community(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Json(request): Json<NewCommunity>,
) -> BackendResult<(StatusCode, Json<Community>)> {
    request.validate()?;
    let pool = state.pool()?;
    let id = db::create_community(pool, owner, &request).await?;
    tracing::info!("Community '{}' created by {}", request.name.trim(), owner);

    let community = db::get_community(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Community not found"))?;
    Ok((StatusCode::CREATED, Json(community)))
}

pub async fn join_community(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(community_id): Path<Uuid>,
) -> BackendResult<Json<MembershipStatus>> {
    let pool = state.pool()?;
    if db::community_owner(pool, community_id).await?.is_none() {
        return Err(BackendError::not_found("Community not found"));
    }
    db::join(pool, community_id, caller).await?;
    Ok(Json(db::membership(pool, community_id, caller).await?))
}

pub async fn leave_community(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(community_id): Path<Uuid>,
) -> BackendResult<Json<MembershipStatus>> {
    let pool = state.pool()?;
    let owner = db::community_owner(pool, community_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Community not found"))?;
    if owner == caller {
        return Err(BackendError::bad_request("The owner cannot leave their community"));
    }
    db::leave(pool, community_id, caller).await?;
    Ok(Json(db::membership(pool, community_id, caller).await?))
}
