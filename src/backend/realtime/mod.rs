//! Realtime Presence
//!
//! Server side of the presence channel.
//!
//! ```text
//! realtime/
//! ├── presence.rs - PresenceRegistry (sockets per user + broadcast)
//! └── socket.rs   - /ws upgrade handler and /api/online-users
//! ```

pub mod presence;
pub mod socket;

pub use presence::PresenceRegistry;
pub use socket::{online_users, presence_socket, AUTH_TIMEOUT};
