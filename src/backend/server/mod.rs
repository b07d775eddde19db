//! Server Module
//!
//! ```text
//! server/
//! ├── config.rs - ServerConfig and database loading
//! ├── state.rs  - AppState and FromRef impls
//! └── init.rs   - create_app
//! ```

pub mod config;
pub mod init;
pub mod state;

pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
