/**
 * Authentication Extractors
 *
 * `AuthUser` pulls `Authorization: Bearer <jwt>` from the request, verifies
 * it with the configured secret and yields the caller's user ID. Handlers
 * that take an `AuthUser` argument are therefore authenticated routes; a
 * missing or invalid token is rejected with 401 before the handler runs.
 *
 * `MaybeAuthUser` does the same but lets anonymous requests through, for
 * routes whose output depends on the viewer (e.g. `liked_by_me`).
 */

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::backend::auth::sessions::user_id_from_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaybeAuthUser(pub Option<Uuid>);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::unauthorized("Missing Authorization header")
        })?;
        let user_id = user_id_from_token(token, &state.config.jwt_secret)?;
        Ok(AuthUser(user_id))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(MaybeAuthUser(Some(user_id_from_token(
                token,
                &state.config.jwt_secret,
            )?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

/// The bearer token, if an Authorization header is present
fn bearer_token(parts: &Parts) -> Result<Option<&str>, BackendError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| BackendError::unauthorized("Invalid Authorization header"))?;
    value.strip_prefix("Bearer ").map(Some).ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::unauthorized("Invalid Authorization header format")
    })
}
