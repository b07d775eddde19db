/**
 * Product and Chapter Queries
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::content::{Chapter, NewChapter, NewProduct, Product, ProductKind};

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.author_id, p.community_id, p.kind, p.title, p.description, p.cover_url,
           (SELECT COUNT(*) FROM chapters c WHERE c.product_id = p.id) AS chapter_count,
           p.created_at
    FROM products p
"#;

/// Newest first, optionally of one kind
pub async fn list_products(
    pool: &PgPool,
    kind: Option<ProductKind>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "{} WHERE ($1::product_kind IS NULL OR p.kind = $1) ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
        PRODUCT_SELECT
    ))
    .bind(kind)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_product(pool: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn product_author(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT author_id FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_product(
    pool: &PgPool,
    author: Uuid,
    product: &NewProduct,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO products (id, author_id, community_id, kind, title, description, cover_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author)
    .bind(product.community_id)
    .bind(product.kind)
    .bind(product.title.trim())
    .bind(product.description.as_deref())
    .bind(product.cover_url.as_deref())
    .fetch_one(pool)
    .await
}

/// In reading order
pub async fn list_chapters(
    pool: &PgPool,
    product: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Chapter>, sqlx::Error> {
    sqlx::query_as::<_, Chapter>(
        r#"
        SELECT id, product_id, number, title, body, created_at
        FROM chapters
        WHERE product_id = $1
        ORDER BY number ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(product)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Insert a chapter; without a number it goes after the current last one.
/// A taken number violates `unique(product_id, number)`.
pub async fn create_chapter(
    pool: &PgPool,
    product: Uuid,
    chapter: &NewChapter,
) -> Result<Chapter, sqlx::Error> {
    sqlx::query_as::<_, Chapter>(
        r#"
        INSERT INTO chapters (id, product_id, number, title, body)
        VALUES (
            $1, $2,
            COALESCE($3, (SELECT COALESCE(MAX(number), 0) + 1 FROM chapters WHERE product_id = $2)),
            $4, $5
        )
        RETURNING id, product_id, number, title, body, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(product)
    .bind(chapter.number)
    .bind(chapter.title.trim())
    .bind(&chapter.body)
    .fetch_one(pool)
    .await
}
