//! Products and Chapters

pub mod db;
pub mod handlers;

pub use handlers::{create_chapter, create_product, get_product, list_chapters, list_products};
