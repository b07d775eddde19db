//! Client Error Types
//!
//! Errors returned by the REST client and by presence client construction.
//! The presence connection itself never returns errors to callers; it only
//! reports its state.

use thiserror::Error;

use crate::shared::{ConfigError, SharedError};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The operation needs a session credential and none is present
    #[error("not authenticated")]
    NotAuthenticated,

    /// WebSocket transport failure
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task was requested outside a tokio runtime
    #[error("no tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// The in-memory or network connection went away
    #[error("connection closed")]
    Closed,
}

impl ClientError {
    /// HTTP status of an `Api` error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
