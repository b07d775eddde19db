//! Quillnest - Main Library
//!
//! Quillnest is a social platform for writers: poems with likes and comments,
//! follows, communities, and long-form manga, light novels and books
//! published chapter by chapter. An online-presence channel tells every
//! connected client who is currently signed in.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and client
//!   - Presence frames and their decoder
//!   - REST request/response bodies and validation
//!   - Error types
//!
//! - **`client`** - Native client side
//!   - Presence client with bounded reconnect backoff
//!   - REST client for auth, follows, likes, profiles and avatars
//!   - Session persistence
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and presence WebSocket
//!   - PostgreSQL persistence via sqlx
//!   - JWT authentication
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the backend module and the server binary
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use quillnest::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() {
//! let app = create_app(ServerConfig::default()).await;
//! // Serve with axum::serve
//! # }
//! ```
//!
//! ## Presence Client
//!
//! ```rust,no_run
//! use quillnest::client::{ClientConfig, PresenceClient, SessionStore, WsConnector};
//!
//! # async fn example(store: SessionStore) -> Result<(), quillnest::client::ClientError> {
//! let config = ClientConfig::from_env()?;
//! let session = store.load()?;
//! let client = PresenceClient::spawn(&config, &session, WsConnector)?;
//! println!("{:?}", client.online_users());
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Server**: presence state sits behind `Arc<Mutex<>>` with a
//!   `broadcast::Sender` for fan-out
//! - **Client**: one driver task owns the socket; readers observe it through
//!   `watch` channels

/// Shared types and data structures
pub mod shared;

/// Native client: presence and REST
pub mod client;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
