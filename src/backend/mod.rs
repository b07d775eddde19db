//! Backend Module
//!
//! Server side of Quillnest, compiled with the `ssr` feature: an axum
//! application serving the REST API, the presence WebSocket and uploaded
//! files, backed by PostgreSQL.
//!
//! ```text
//! backend/
//! ├── server/     - configuration, state, initialization
//! ├── routes/     - router assembly
//! ├── error/      - BackendError and its HTTP conversion
//! ├── middleware/ - authentication extractors
//! ├── auth/       - users, tokens, signup/login/me
//! ├── realtime/   - presence registry and socket handler
//! ├── profile/    - profiles, follower lists, avatar upload
//! ├── social/     - follows and likes
//! ├── content/    - poems and comments
//! ├── community/  - communities and membership
//! └── catalog/    - products and chapters
//! ```
//!
//! The database is optional at runtime. Without it the server still serves
//! presence and static files; data routes answer 503.
//!
//! ```rust,no_run
//! use quillnest::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let addr = config.bind_addr()?;
//! let app = create_app(config).await;
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication extractors
pub mod middleware;

/// Authentication and user management
pub mod auth;

/// Presence registry and WebSocket handler
pub mod realtime;

/// Profiles and avatars
pub mod profile;

/// Follows and likes
pub mod social;

/// Poems and comments
pub mod content;

/// Communities
pub mod community;

/// Manga, light novels, books and their chapters
pub mod catalog;

pub use error::BackendError;
pub use realtime::PresenceRegistry;
pub use server::{create_app, AppState, ServerConfig};
