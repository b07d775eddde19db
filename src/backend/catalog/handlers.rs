/**
 * Product and Chapter Handlers
 *
 * Products are long-form works (manga, light novels, books) optionally
 * attached to a community. Only a product's author may add chapters.
 */

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::backend::catalog::db;
use crate::backend::community::db::community_owner;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::content::{Chapter, NewChapter, NewProduct, PageQuery, Product, ProductQuery};

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> BackendResult<Json<Vec<Product>>> {
    let pool = state.pool()?;
    let (limit, offset) = query.page().limit_offset();
    Ok(Json(db::list_products(pool, query.kind, limit, offset).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> BackendResult<Json<Product>> {
    let pool = state.pool()?;
    db::get_product(pool, product_id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Product not found"))
}

pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(author): AuthUser,
    Json(request): Json<NewProduct>,
) -> BackendResult<(StatusCode, Json<Product>)> {
    request.validate()?;
    let pool = state.pool()?;
    if let Some(community_id) = request.community_id {
        if community_owner(pool, community_id).await?.is_none() {
            return Err(BackendError::not_found("Community not found"));
        }
    }

    let id = db::create_product(pool, author, &request).await?;
    tracing::info!("{:?} '{}' created by {}", request.kind, request.title.trim(), author);

    let product = db::get_product(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Product not found"))?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_chapters(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<Vec<Chapter>>> {
    let pool = state.pool()?;
    if db::product_author(pool, product_id).await?.is_none() {
        return Err(BackendError::not_found("Product not found"));
    }
    let (limit, offset) = page.limit_offset();
    Ok(Json(db::list_chapters(pool, product_id, limit, offset).await?))
}

pub async fn create_chapter(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(product_id): Path<Uuid>,
    Json(request): Json<NewChapter>,
) -> BackendResult<(StatusCode, Json<Chapter>)> {
    request.validate()?;
    let pool = state.pool()?;
    let author = db::product_author(pool, product_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Product not found"))?;
    if author != caller {
        return Err(BackendError::forbidden("Only the author can add chapters"));
    }

    let chapter = db::create_chapter(pool, product_id, &request).await?;
    tracing::info!("Chapter {} added to product {}", chapter.number, product_id);
    Ok((StatusCode::CREATED, Json(chapter)))
}
