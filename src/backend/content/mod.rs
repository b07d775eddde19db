//! Poems and Comments

pub mod db;
pub mod handlers;

pub use handlers::{
    create_comment, create_poem, delete_comment, delete_poem, get_poem, list_comments, list_poems,
    update_poem,
};
