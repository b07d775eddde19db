/**
 * Follow and Like Queries
 *
 * Inserts use `ON CONFLICT DO NOTHING` so repeated follows and likes are
 * no-ops rather than errors.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::social::{FollowStatus, LikeStatus};

pub async fn follow(pool: &PgPool, follower: Uuid, following: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO follows (follower_id, following_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(follower)
    .bind(following)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn unfollow(pool: &PgPool, follower: Uuid, following: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
        .bind(follower)
        .bind(following)
        .execute(pool)
        .await?;
    Ok(())
}

/// Whether `viewer` follows `target`, plus the target's counts
pub async fn follow_status(
    pool: &PgPool,
    viewer: Uuid,
    target: Uuid,
) -> Result<FollowStatus, sqlx::Error> {
    let (following, followers_count, following_count): (bool, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2),
            (SELECT COUNT(*) FROM follows WHERE following_id = $2),
            (SELECT COUNT(*) FROM follows WHERE follower_id = $2)
        "#,
    )
    .bind(viewer)
    .bind(target)
    .fetch_one(pool)
    .await?;
    Ok(FollowStatus {
        following,
        followers_count,
        following_count,
    })
}

pub async fn like_poem(pool: &PgPool, user: Uuid, poem: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO poem_likes (user_id, poem_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user)
    .bind(poem)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn unlike_poem(pool: &PgPool, user: Uuid, poem: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM poem_likes WHERE user_id = $1 AND poem_id = $2")
        .bind(user)
        .bind(poem)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn like_status(pool: &PgPool, user: Uuid, poem: Uuid) -> Result<LikeStatus, sqlx::Error> {
    let (liked, like_count): (bool, i64) = sqlx::query_as(
        r#"
        SELECT
            EXISTS (SELECT 1 FROM poem_likes WHERE user_id = $1 AND poem_id = $2),
            (SELECT COUNT(*) FROM poem_likes WHERE poem_id = $2)
        "#,
    )
    .bind(user)
    .bind(poem)
    .fetch_one(pool)
    .await?;
    Ok(LikeStatus { liked, like_count })
}
