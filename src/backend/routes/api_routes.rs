/**
 * API Routes
 *
 * Every REST endpoint under `/api`. Authentication is enforced per handler
 * through the `AuthUser` extractor.
 */

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::backend::auth::{get_me, login, signup};
use crate::backend::catalog::{create_chapter, create_product, get_product, list_chapters, list_products};
use crate::backend::community::{
    create_community, get_community, join_community, leave_community, list_communities,
};
use crate::backend::content::{
    create_comment, create_poem, delete_comment, delete_poem, get_poem, list_comments, list_poems,
    update_poem,
};
use crate::backend::profile::{get_profile, list_followers, list_following, update_profile, upload_avatar};
use crate::backend::realtime::online_users;
use crate::backend::server::state::AppState;
use crate::backend::social::{follow_status, follow_user, like_poem, unfollow_user, unlike_poem};
use crate::shared::social::AVATAR_MAX_BYTES;

/// Room for multipart headers around the largest accepted avatar
const AVATAR_BODY_LIMIT: usize = AVATAR_MAX_BYTES + 64 * 1024;

pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_me))
        // Presence
        .route("/api/online-users", get(online_users))
        // Users and profiles
        .route("/api/users/{id}", get(get_profile).put(update_profile))
        .route(
            "/api/users/{id}/avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
        .route("/api/users/{id}/followers", get(list_followers))
        .route("/api/users/{id}/following", get(list_following))
        // Follows
        .route("/api/follow/{id}", post(follow_user).delete(unfollow_user))
        .route("/api/follow/{id}/status", get(follow_status))
        // Poems, likes, comments
        .route("/api/poems", get(list_poems).post(create_poem))
        .route(
            "/api/poems/{id}",
            get(get_poem).put(update_poem).delete(delete_poem),
        )
        .route("/api/poems/{id}/like", post(like_poem).delete(unlike_poem))
        .route(
            "/api/poems/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/api/comments/{id}", delete(delete_comment))
        // Communities
        .route("/api/communities", get(list_communities).post(create_community))
        .route("/api/communities/{id}", get(get_community))
        .route(
            "/api/communities/{id}/members",
            post(join_community).delete(leave_community),
        )
        // Products and chapters
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/{id}", get(get_product))
        .route(
            "/api/products/{id}/chapters",
            get(list_chapters).post(create_chapter),
        )
}
