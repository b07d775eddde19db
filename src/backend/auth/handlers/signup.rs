/**
 * Signup Handler
 *
 * `POST /api/auth/signup`
 *
 * 1. Validate username, email and password
 * 2. Reject taken usernames and emails with 409
 * 3. Hash the password with bcrypt and create the user
 * 4. Return a token and the new user
 */

use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};

use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::auth::{AuthResponse, SignupRequest};

const MIN_PASSWORD_LEN: usize = 8;

/// 3-30 chars, starts with a letter, then letters, digits or underscores
pub(crate) fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }
    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate(request: &SignupRequest) -> BackendResult<()> {
    if !is_valid_username(&request.username) {
        tracing::warn!("Invalid username format: {}", request.username);
        return Err(BackendError::bad_request(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }
    if !request.email.contains('@') {
        tracing::warn!("Invalid email format: {}", request.email);
        return Err(BackendError::bad_request("Invalid email format"));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(BackendError::bad_request("Password must be at least 8 characters"));
    }
    Ok(())
}

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> BackendResult<Json<AuthResponse>> {
    validate(&request)?;
    let pool = state.pool()?;
    tracing::info!("Signup request for username: {}", request.username);

    if get_user_by_username(pool, &request.username).await?.is_some() {
        tracing::warn!("Username already exists: {}", request.username);
        return Err(BackendError::conflict("Username already taken"));
    }
    if get_user_by_email(pool, &request.email).await?.is_some() {
        tracing::warn!("Email already exists: {}", request.email);
        return Err(BackendError::conflict("Email already registered"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)?;
    let user = create_user(pool, &request.username, &request.email, &password_hash).await?;
    let token = create_token(user.id, &user.username, &state.config)?;

    tracing::info!("User created successfully: {}", user.username);
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
