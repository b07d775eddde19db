//! Route Configuration
//!
//! ```text
//! routes/
//! ├── router.rs     - create_router: /ws, /api, /uploads, fallback, layers
//! └── api_routes.rs - every /api endpoint
//! ```

pub mod api_routes;
pub mod router;

pub use router::create_router;
