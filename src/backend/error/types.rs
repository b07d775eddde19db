/**
 * Backend Error Types
 *
 * Every handler returns `Result<_, BackendError>`. Request problems carry
 * their own status code; infrastructure failures (database, filesystem,
 * hashing) are reported to the client as a generic 500 and logged in full.
 *
 * # Status Code Mapping
 *
 * - `HandlerError` - the status it was built with
 * - `SharedError` - 400 for validation, 500 otherwise
 * - `Database` - 409 on unique violations, 500 otherwise
 * - everything else - 500
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Message returned to clients for any 500
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum BackendError {
    /// Request-level failure with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        status: StatusCode,
        message: String,
    },

    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    /// No database configured
    pub fn unavailable() -> Self {
        Self::handler(StatusCode::SERVICE_UNAVAILABLE, "Database not configured")
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
            Self::SharedError(SharedError::MalformedFrame { .. }) => StatusCode::BAD_REQUEST,
            Self::SharedError(SharedError::SerializationError { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Database(err) if is_unique_violation(err) => StatusCode::CONFLICT,
            Self::Database(_)
            | Self::Io(_)
            | Self::PasswordHash(_)
            | Self::Token(_)
            | Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(SharedError::ValidationError { field, message }) => {
                format!("{}: {}", field, message)
            }
            Self::SharedError(SharedError::MalformedFrame { message }) => message.clone(),
            Self::Database(err) if is_unique_violation(err) => "Already exists".to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}
