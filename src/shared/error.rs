//! Shared Error Types
//!
//! Errors that can occur on both sides of the wire: decoding presence frames,
//! validating request payloads, and (de)serializing shared types.
//!
//! # Usage
//!
//! ```rust
//! use quillnest::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "Title cannot be empty");
//! assert!(error.to_string().contains("title"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both client and server
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// Request field, or `body` for whole-payload checks
        field: String,
        message: String,
    },

    /// A presence frame that is not JSON, has no `type`, or has the wrong
    /// shape for its `type`
    #[error("Malformed frame: {message}")]
    MalformedFrame { message: String },
}

impl SharedError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedFrame {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
