//! Follows and Likes

pub mod db;
pub mod handlers;

pub use handlers::{follow_status, follow_user, like_poem, unfollow_user, unlike_poem};
