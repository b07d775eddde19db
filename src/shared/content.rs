//! Content types: poems, comments, communities, products and chapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::social::check_len;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `?page=&limit=` query parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// SQL `(LIMIT, OFFSET)`; page is 1-based and limit is clamped
    pub fn limit_offset(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as i64;
        let page = self.page.unwrap_or(1).max(1) as i64;
        (limit, (page - 1) * limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Poem {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub title: String,
    pub body: String,
    pub like_count: i64,
    pub comment_count: i64,
    /// Whether the requesting user liked this poem; false for anonymous callers
    pub liked_by_me: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/poems` and `PUT /api/poems/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPoem {
    pub title: String,
    pub body: String,
}

impl NewPoem {
    pub fn validate(&self) -> Result<(), SharedError> {
        check_len("title", &self.title, 1, 200)?;
        check_len("body", &self.body, 1, 20_000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub poem_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub body: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), SharedError> {
        check_len("body", &self.body, 1, 2_000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommunity {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCommunity {
    pub fn validate(&self) -> Result<(), SharedError> {
        check_len("name", &self.name, 3, 50)?;
        if let Some(description) = &self.description {
            check_len("description", description, 0, 1_000)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipStatus {
    pub member: bool,
    pub member_count: i64,
}

/// Kind of long-form product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "product_kind", rename_all = "snake_case")]
pub enum ProductKind {
    Manga,
    LightNovel,
    Book,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub author_id: Uuid,
    pub community_id: Option<Uuid>,
    pub kind: ProductKind,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub chapter_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub kind: ProductKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub community_id: Option<Uuid>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), SharedError> {
        check_len("title", &self.title, 1, 200)?;
        if let Some(description) = &self.description {
            check_len("description", description, 0, 5_000)?;
        }
        if let Some(cover) = &self.cover_url {
            if !cover.starts_with("/uploads/") && !cover.starts_with("https://") {
                return Err(SharedError::validation(
                    "cover_url",
                    "must be an uploaded file or an https URL",
                ));
            }
        }
        Ok(())
    }
}

/// `GET /api/products` query parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub kind: Option<ProductKind>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chapter {
    pub id: Uuid,
    pub product_id: Uuid,
    pub number: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChapter {
    /// Chapter number; the next free number when omitted
    #[serde(default)]
    pub number: Option<i32>,
    pub title: String,
    pub body: String,
}

impl NewChapter {
    pub fn validate(&self) -> Result<(), SharedError> {
        if matches!(self.number, Some(n) if n < 1) {
            return Err(SharedError::validation("number", "must be positive"));
        }
        check_len("title", &self.title, 1, 200)?;
        check_len("body", &self.body, 1, 200_000)
    }
}
