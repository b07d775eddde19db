/**
 * Poem and Comment Handlers
 *
 * Reading is public; writing needs a token. Only the author may edit or
 * delete a poem, and only a comment's author may delete it.
 */

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::backend::content::db;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AuthUser, MaybeAuthUser};
use crate::backend::server::state::AppState;
use crate::shared::content::{Comment, NewComment, NewPoem, PageQuery, Poem};

pub async fn list_poems(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<Vec<Poem>>> {
    let pool = state.pool()?;
    let (limit, offset) = page.limit_offset();
    Ok(Json(db::list_poems(pool, viewer, limit, offset).await?))
}

pub async fn get_poem(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(poem_id): Path<Uuid>,
) -> BackendResult<Json<Poem>> {
    let pool = state.pool()?;
    db::get_poem(pool, viewer, poem_id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Poem not found"))
}

pub async fn create_poem(
    State(state): State<AppState>,
    AuthUser(author): AuthUser,
    Json(request): Json<NewPoem>,
) -> BackendResult<(StatusCode, Json<Poem>)> {
    request.validate()?;
    let pool = state.pool()?;
    let id = db::create_poem(pool, author, &request).await?;
    tracing::info!("Poem {} created by {}", id, author);

    let poem = db::get_poem(pool, Some(author), id)
        .await?
        .ok_or_else(|| BackendError::not_found("Poem not found"))?;
    Ok((StatusCode::CREATED, Json(poem)))
}

pub async fn update_poem(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(poem_id): Path<Uuid>,
    Json(request): Json<NewPoem>,
) -> BackendResult<Json<Poem>> {
    request.validate()?;
    let pool = state.pool()?;
    require_poem_author(pool, poem_id, caller).await?;
    db::update_poem(pool, poem_id, &request).await?;

    db::get_poem(pool, Some(caller), poem_id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Poem not found"))
}

pub async fn delete_poem(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(poem_id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    let pool = state.pool()?;
    require_poem_author(pool, poem_id, caller).await?;
    db::delete_poem(pool, poem_id).await?;
    tracing::info!("Poem {} deleted by {}", poem_id, caller);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(poem_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<Vec<Comment>>> {
    let pool = state.pool()?;
    if !db::poem_exists(pool, poem_id).await? {
        return Err(BackendError::not_found("Poem not found"));
    }
    let (limit, offset) = page.limit_offset();
    Ok(Json(db::list_comments(pool, poem_id, limit, offset).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(author): AuthUser,
    Path(poem_id): Path<Uuid>,
    Json(request): Json<NewComment>,
) -> BackendResult<(StatusCode, Json<Comment>)> {
    request.validate()?;
    let pool = state.pool()?;
    if !db::poem_exists(pool, poem_id).await? {
        return Err(BackendError::not_found("Poem not found"));
    }
    let comment = db::create_comment(pool, poem_id, author, &request).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(comment_id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    let pool = state.pool()?;
    let author = db::comment_author(pool, comment_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;
    if author != caller {
        return Err(BackendError::forbidden("You can only delete your own comments"));
    }
    db::delete_comment(pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_poem_author(pool: &sqlx::PgPool, poem_id: Uuid, caller: Uuid) -> BackendResult<()> {
    let author = db::poem_author(pool, poem_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Poem not found"))?;
    if author != caller {
        tracing::warn!("{} tried to modify poem {} owned by {}", caller, poem_id, author);
        return Err(BackendError::forbidden("Only the author can modify this poem"));
    }
    Ok(())
}
