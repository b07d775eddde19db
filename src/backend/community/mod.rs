//! Communities and Membership

pub mod db;
pub mod handlers;

pub use handlers::{create_community, get_community, join_community, leave_community, list_communities};
