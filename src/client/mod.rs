//! Native Client
//!
//! Async client side of Quillnest:
//!
//! - **`presence`** - reconnecting presence connection and online-user state
//! - **`transport`** - `Connector`/`Connection` seam plus the WebSocket implementation
//! - **`backoff`** - reconnect ceiling and delays
//! - **`api`** - typed REST client
//! - **`session`** - injected session and its on-disk store
//! - **`config`** - endpoints and connection behaviour
//! - **`error`** - `ClientError`

pub mod api;
pub mod backoff;
pub mod config;
pub mod error;
pub mod presence;
pub mod session;
pub mod transport;

pub use api::ApiClient;
pub use backoff::ReconnectPolicy;
pub use config::ClientConfig;
pub use error::ClientError;
pub use presence::{ConnectionState, ConnectionStatus, PresenceClient};
pub use session::{Session, SessionStore, SessionUser};
pub use transport::{Connection, Connector, WsConnection, WsConnector, NORMAL_CLOSURE};
