/**
 * Community Queries
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::content::{Community, MembershipStatus, NewCommunity};

const COMMUNITY_SELECT: &str = r#"
    SELECT c.id, c.name, c.description, c.owner_id,
           (SELECT COUNT(*) FROM community_members m WHERE m.community_id = c.id) AS member_count,
           c.created_at
    FROM communities c
"#;

pub async fn list_communities(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Community>, sqlx::Error> {
    sqlx::query_as::<_, Community>(&format!(
        "{} ORDER BY c.created_at DESC LIMIT $1 OFFSET $2",
        COMMUNITY_SELECT
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_community(pool: &PgPool, id: Uuid) -> Result<Option<Community>, sqlx::Error> {
    sqlx::query_as::<_, Community>(&format!("{} WHERE c.id = $1", COMMUNITY_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Create the community and make the owner its first member
pub async fn create_community(
    pool: &PgPool,
    owner: Uuid,
    community: &NewCommunity,
) -> Result<Uuid, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO communities (id, name, description, owner_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(community.name.trim())
    .bind(community.description.as_deref())
    .bind(owner)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO community_members (community_id, user_id) VALUES ($1, $2)")
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(id)
}

pub async fn community_owner(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT owner_id FROM communities WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn join(pool: &PgPool, community: Uuid, user: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO community_members (community_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(community)
    .bind(user)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn leave(pool: &PgPool, community: Uuid, user: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM community_members WHERE community_id = $1 AND user_id = $2")
        .bind(community)
        .bind(user)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn membership(
    pool: &PgPool,
    community: Uuid,
    user: Uuid,
) -> Result<MembershipStatus, sqlx::Error> {
    let (member, member_count): (bool, i64) = sqlx::query_as(
        r#"
        SELECT
            EXISTS (SELECT 1 FROM community_members WHERE community_id = $1 AND user_id = $2),
            (SELECT COUNT(*) FROM community_members WHERE community_id = $1)
        "#,
    )
    .bind(community)
    .bind(user)
    .fetch_one(pool)
    .await?;
    Ok(MembershipStatus {
        member,
        member_count,
    })
}
