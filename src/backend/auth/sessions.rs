/**
 * Session Tokens
 *
 * HS256 JWTs signed with the configured secret. The subject is the user's
 * UUID; tokens live for `token_ttl_days`.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::config::ServerConfig;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

pub fn create_token(
    user_id: Uuid,
    username: &str,
    config: &ServerConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp().max(0) as u64;
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: now + config.token_ttl_days * SECONDS_PER_DAY,
        iat: now,
    };
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

/// User ID of a valid token; any failure is a 401
pub fn user_id_from_token(token: &str, secret: &str) -> BackendResult<Uuid> {
    let claims = verify_token(token, secret).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;
    Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid user ID in token: {}", e);
        BackendError::unauthorized("Invalid or expired token")
    })
}
