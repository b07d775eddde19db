//! Shared Module
//!
//! Types shared between the server and the native client: the presence
//! channel's wire frames, REST request/response bodies, endpoint
//! configuration and the shared error type.
//!
//! Everything here is plain data plus validation and compiles without the
//! `ssr` feature.

/// Authentication request/response bodies
pub mod auth;

/// Presence channel frames
pub mod presence;

/// Profiles, follows, likes, avatars
pub mod social;

/// Poems, comments, communities, products, chapters
pub mod content;

/// Shared error types
pub mod error;

/// Endpoint configuration
pub mod config;

pub use presence::{decode_frame, DecodedFrame, PresenceFrame};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
