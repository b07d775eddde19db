/**
 * Login Handler
 *
 * `POST /api/auth/login`. The `username` field may also hold an email
 * address. Unknown users and wrong passwords both answer 401.
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{get_user_by_email, get_user_by_username};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::auth::{AuthResponse, LoginRequest};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<Json<AuthResponse>> {
    let pool = state.pool()?;
    tracing::info!("Login request for: {}", request.username);

    let user = if request.username.contains('@') {
        get_user_by_email(pool, &request.username).await?
    } else {
        get_user_by_username(pool, &request.username).await?
    };
    let user = user.ok_or_else(|| {
        tracing::warn!("User not found: {}", request.username);
        BackendError::unauthorized("Invalid credentials")
    })?;

    if !verify(&request.password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", request.username);
        return Err(BackendError::unauthorized("Invalid credentials"));
    }

    let token = create_token(user.id, &user.username, &state.config)?;
    tracing::info!("User logged in successfully: {}", user.username);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
