/**
 * Poem and Comment Queries
 *
 * Like and comment counts are computed per row. `liked_by_me` compares
 * against the viewer passed as `$1`, which is NULL for anonymous readers.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::content::{Comment, NewComment, NewPoem, Poem};

const POEM_SELECT: &str = r#"
    SELECT p.id, p.author_id, u.username AS author_username, p.title, p.body,
           (SELECT COUNT(*) FROM poem_likes l WHERE l.poem_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM comments c WHERE c.poem_id = p.id) AS comment_count,
           EXISTS (SELECT 1 FROM poem_likes l WHERE l.poem_id = p.id AND l.user_id = $1) AS liked_by_me,
           p.created_at, p.updated_at
    FROM poems p
    JOIN users u ON u.id = p.author_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.poem_id, c.author_id, u.username AS author_username, c.body, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

/// Newest first
pub async fn list_poems(
    pool: &PgPool,
    viewer: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Poem>, sqlx::Error> {
    sqlx::query_as::<_, Poem>(&format!(
        "{} ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
        POEM_SELECT
    ))
    .bind(viewer)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_poem(
    pool: &PgPool,
    viewer: Option<Uuid>,
    id: Uuid,
) -> Result<Option<Poem>, sqlx::Error> {
    sqlx::query_as::<_, Poem>(&format!("{} WHERE p.id = $2", POEM_SELECT))
        .bind(viewer)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn poem_exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM poems WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn poem_author(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT author_id FROM poems WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_poem(pool: &PgPool, author: Uuid, poem: &NewPoem) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO poems (id, author_id, title, body)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author)
    .bind(poem.title.trim())
    .bind(&poem.body)
    .fetch_one(pool)
    .await
}

pub async fn update_poem(pool: &PgPool, id: Uuid, poem: &NewPoem) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE poems SET title = $2, body = $3, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(poem.title.trim())
        .bind(&poem.body)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_poem(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM poems WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Oldest first, so threads read top to bottom
pub async fn list_comments(
    pool: &PgPool,
    poem: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "{} WHERE c.poem_id = $1 ORDER BY c.created_at ASC LIMIT $2 OFFSET $3",
        COMMENT_SELECT
    ))
    .bind(poem)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn create_comment(
    pool: &PgPool,
    poem: Uuid,
    author: Uuid,
    comment: &NewComment,
) -> Result<Comment, sqlx::Error> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO comments (id, poem_id, author_id, body)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(poem)
    .bind(author)
    .bind(comment.body.trim())
    .fetch_one(pool)
    .await?;

    sqlx::query_as::<_, Comment>(&format!("{} WHERE c.id = $1", COMMENT_SELECT))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn comment_author(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT author_id FROM comments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn delete_comment(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
