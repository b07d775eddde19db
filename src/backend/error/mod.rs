//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion to responses.
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - BackendError and status mapping
//! └── conversion.rs - IntoResponse
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::{BackendError, BackendResult, INTERNAL_ERROR_MESSAGE};
