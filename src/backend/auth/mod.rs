//! Authentication Module
//!
//! ```text
//! auth/
//! ├── users.rs     - User model and queries
//! ├── sessions.rs  - JWT creation and verification
//! └── handlers/    - signup, login, me
//! ```
//!
//! Passwords are hashed with bcrypt. Tokens are HS256 JWTs signed with the
//! configured secret and expire after `token_ttl_days` (30 by default).

pub mod handlers;
pub mod sessions;
pub mod users;

pub use handlers::{get_me, login, signup};
