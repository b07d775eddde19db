/**
 * Server Configuration
 *
 * Settings are layered: built-in defaults, then an optional TOML file named
 * by `QUILLNEST_CONFIG`, then environment variables (a `.env` file is loaded
 * by the binary beforehand).
 *
 * | Variable          | Default                    |
 * |-------------------|----------------------------|
 * | `SERVER_HOST`     | `0.0.0.0`                  |
 * | `SERVER_PORT`     | `3000`                     |
 * | `DATABASE_URL`    | unset (database disabled)  |
 * | `JWT_SECRET`      | development secret         |
 * | `TOKEN_TTL_DAYS`  | `30`                       |
 * | `UPLOAD_DIR`      | `uploads`                  |
 * | `CORS_PERMISSIVE` | `false`                    |
 *
 * The database is optional: when it cannot be reached the server still
 * starts, serves presence, and answers data routes with 503.
 */

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sqlx::PgPool;

use crate::shared::ConfigError;

const DEV_JWT_SECRET: &str = "quillnest-dev-secret-change-me";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_days: u64,
    pub upload_dir: PathBuf,
    /// Allow any origin; otherwise CORS is restricted to localhost
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: 30,
            upload_dir: PathBuf::from("uploads"),
            cors_permissive: false,
        }
    }
}

impl ServerConfig {
    /// Defaults, then `QUILLNEST_CONFIG`, then environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var("QUILLNEST_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::InvalidValue {
            key: "QUILLNEST_CONFIG",
            message: e.to_string(),
        })
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = parse_var("SERVER_PORT", &port)?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Ok(days) = std::env::var("TOKEN_TTL_DAYS") {
            self.token_ttl_days = parse_var("TOKEN_TTL_DAYS", &days)?;
        }
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Ok(flag) = std::env::var("CORS_PERMISSIVE") {
            self.cors_permissive = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        if self.jwt_secret == DEV_JWT_SECRET {
            tracing::warn!("JWT_SECRET not set; using the development secret");
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                key: "SERVER_HOST",
                message: e.to_string(),
            })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        message: e.to_string(),
    })
}

/// Connect to PostgreSQL and apply migrations.
///
/// Returns `None` when no URL is configured or the connection fails; the
/// server keeps running without database features.
pub async fn load_database(config: &ServerConfig) -> Option<PgPool> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
        return None;
    };

    tracing::info!("Connecting to database...");
    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
