//! Social types: profiles, follows, likes and avatars.
//!
//! These are the request and response bodies of the profile and social REST
//! routes, used by both the server handlers and the REST client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Largest accepted avatar upload, in bytes (5 MB)
pub const AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Avatar MIME types accepted by the upload route
pub const AVATAR_ALLOWED_MIME: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// File extension used when storing an avatar of the given MIME type
pub fn avatar_extension(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Check an avatar against the MIME allow-list and size limit.
///
/// Returns the extension to store the file under.
pub fn validate_avatar(mime: &str, len: usize) -> Result<&'static str, SharedError> {
    let ext = avatar_extension(mime).ok_or_else(|| {
        SharedError::validation(
            "avatar",
            format!("Unsupported image type '{}'; allowed: {}", mime, AVATAR_ALLOWED_MIME.join(", ")),
        )
    })?;
    if len == 0 {
        return Err(SharedError::validation("avatar", "File is empty"));
    }
    if len > AVATAR_MAX_BYTES {
        return Err(SharedError::validation("avatar", "File exceeds the 5MB limit"));
    }
    Ok(ext)
}

/// Check that a text field's character count is within bounds
pub(crate) fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), SharedError> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(SharedError::validation(
            field,
            if min == 1 {
                "must not be empty".to_string()
            } else {
                format!("must be at least {} characters", min)
            },
        ));
    }
    if len > max {
        return Err(SharedError::validation(field, format!("must be at most {} characters", max)));
    }
    Ok(())
}

/// Public view of a user, with follow counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Compact user reference used in follower lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Body of `PUT /api/users/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.display_name.is_none() && self.bio.is_none() {
            return Err(SharedError::validation("body", "nothing to update"));
        }
        if let Some(name) = &self.display_name {
            check_len("display_name", name, 1, 50)?;
        }
        if let Some(bio) = &self.bio {
            check_len("bio", bio, 0, 500)?;
        }
        Ok(())
    }
}

/// Follow relationship between the caller and a target user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowStatus {
    pub following: bool,
    pub followers_count: i64,
    pub following_count: i64,
}

/// Like state of a poem for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineUsersResponse {
    pub users: Vec<Uuid>,
    pub count: usize,
}
