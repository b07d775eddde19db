/**
 * Profile Queries
 *
 * Follower and following counts are computed at read time.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::social::{UserProfile, UserSummary};

pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT u.id, u.username, u.display_name, u.bio, u.avatar_url,
               (SELECT COUNT(*) FROM follows WHERE following_id = u.id) AS followers_count,
               (SELECT COUNT(*) FROM follows WHERE follower_id = u.id) AS following_count,
               u.created_at
        FROM users u
        WHERE u.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Users following `id`, newest first
pub async fn list_followers(
    pool: &PgPool,
    id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.username, u.display_name, u.avatar_url
        FROM follows f
        JOIN users u ON u.id = f.follower_id
        WHERE f.following_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Users `id` follows, newest first
pub async fn list_following(
    pool: &PgPool,
    id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.username, u.display_name, u.avatar_url
        FROM follows f
        JOIN users u ON u.id = f.following_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
