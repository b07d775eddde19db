//! Request Middleware
//!
//! Authentication extractors used by the route handlers.

pub mod auth;

pub use auth::{AuthUser, MaybeAuthUser};
