//! User Profiles
//!
//! Profile reads and edits, follower lists and avatar uploads.

pub mod db;
pub mod handlers;
pub mod upload;

pub use handlers::{get_profile, list_followers, list_following, update_profile};
pub use upload::upload_avatar;
