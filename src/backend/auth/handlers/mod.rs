//! Authentication Handlers
//!
//! - **`signup`** - POST /api/auth/signup
//! - **`login`** - POST /api/auth/login
//! - **`get_me`** - GET /api/auth/me

pub mod login;
pub mod me;
pub mod signup;

pub use login::login;
pub use me::get_me;
pub use signup::signup;
