//! Database test fixtures
//!
//! Tests that need Postgres read `DATABASE_URL`; without it the fixture is
//! `None` and the test returns early.

use quillnest::backend::auth::sessions::create_token;
use quillnest::backend::auth::users::create_user;
use sqlx::PgPool;
use uuid::Uuid;

use super::auth_helpers::test_config;

/// Connect to `DATABASE_URL`, if set
pub async fn create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    Some(
        PgPool::connect(&database_url)
            .await
            .expect("Failed to create test database pool"),
    )
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Remove all rows while keeping the schema
pub async fn cleanup_test_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "TRUNCATE TABLE chapters, products, community_members, communities, \
         poem_likes, comments, poems, follows, users CASCADE",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// A migrated, empty database
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    /// `None` when no database is configured
    pub async fn from_env() -> Option<Self> {
        let pool = create_test_pool().await?;
        run_migrations(&pool).await.expect("Failed to run migrations");
        cleanup_test_data(&pool).await.expect("Failed to clean test data");
        Some(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a user and return its id with a token for it
    pub async fn create_test_user(&self, username: &str) -> (Uuid, String) {
        let user = create_user(
            &self.pool,
            username,
            &format!("{}@example.com", username),
            "not-a-real-hash",
        )
        .await
        .expect("Failed to create test user");
        let token =
            create_token(user.id, username, &test_config()).expect("Failed to create test token");
        (user.id, token)
    }
}
