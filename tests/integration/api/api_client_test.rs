//! REST client tests against a wiremock server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use quillnest::client::{ApiClient, ClientConfig, ClientError, Session, SessionUser};
use quillnest::shared::social::{UpdateProfileRequest, AVATAR_MAX_BYTES};
use quillnest::shared::{AppConfig, SharedError};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{any, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, session: Session) -> ApiClient {
    let config = ClientConfig::with_builder(AppConfig::builder().server_url(server.uri())).unwrap();
    ApiClient::new(config, session).unwrap()
}

fn alice(id: Uuid) -> Session {
    Session::new(
        "tok-alice",
        SessionUser {
            id,
            username: "alice".into(),
        },
    )
}

/// Fails the test on drop if any request reaches the server
async fn expect_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_installs_session() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_string_contains("\"username\":\"alice\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-alice",
            "user": {
                "id": id,
                "username": "alice",
                "email": "alice@example.com",
                "display_name": null,
                "avatar_url": null
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, Session::anonymous());
    let session = client.login("alice", "password123").await.unwrap();

    assert_eq!(session, alice(id));
    assert_eq!(client.session(), &session);
}

#[tokio::test]
async fn test_follow_sends_bearer_token() {
    let server = MockServer::start().await;
    let target = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/api/follow/{}", target)))
        .and(header("authorization", "Bearer tok-alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "following": true,
            "followers_count": 1,
            "following_count": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, alice(Uuid::new_v4()));
    let status = client.follow(target).await.unwrap();
    assert!(status.following);
    assert_eq!(status.followers_count, 1);
}

#[tokio::test]
async fn test_anonymous_calls_never_hit_the_network() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let client = client_for(&server, Session::anonymous());
    assert_matches!(client.follow(Uuid::new_v4()).await, Err(ClientError::NotAuthenticated));
    assert_matches!(client.like_poem(Uuid::new_v4()).await, Err(ClientError::NotAuthenticated));
    assert_matches!(
        client.upload_avatar("me.png", "image/png", vec![0; 16]).await,
        Err(ClientError::NotAuthenticated)
    );
}

#[tokio::test]
async fn test_server_error_body_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "error": "User not found", "status": 404 })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, alice(Uuid::new_v4()));
    let err = client.follow_status(Uuid::new_v4()).await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 404, ref message } if message == "User not found");
}

#[tokio::test]
async fn test_non_json_error_falls_back_to_text() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server, alice(Uuid::new_v4()));
    let err = client.unlike_poem(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("bad gateway"));
}

#[tokio::test]
async fn test_avatar_validated_before_upload() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let client = client_for(&server, alice(Uuid::new_v4()));

    let err = client
        .upload_avatar("me.bmp", "image/bmp", vec![0; 16])
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Shared(SharedError::ValidationError { .. }));

    let err = client
        .upload_avatar("me.png", "image/png", vec![0; AVATAR_MAX_BYTES + 1])
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Shared(SharedError::ValidationError { .. }));
}

#[tokio::test]
async fn test_avatar_upload_multipart() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/api/users/{}/avatar", id)))
        .and(header("authorization", "Bearer tok-alice"))
        .and(body_string_contains("name=\"avatar\""))
        .and(body_string_contains("filename=\"me.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "avatar_url": format!("/uploads/avatar_{}.png", id)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, alice(id));
    let response = client
        .upload_avatar("me.png", "image/png", b"fake png bytes".to_vec())
        .await
        .unwrap();
    assert_eq!(response.avatar_url, format!("/uploads/avatar_{}.png", id));
}

#[tokio::test]
async fn test_update_profile_validates_locally() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let client = client_for(&server, alice(Uuid::new_v4()));

    let empty = UpdateProfileRequest::default();
    assert_matches!(client.update_profile(&empty).await, Err(ClientError::Shared(_)));

    let long_bio = UpdateProfileRequest {
        bio: Some("x".repeat(501)),
        ..Default::default()
    };
    assert_matches!(client.update_profile(&long_bio).await, Err(ClientError::Shared(_)));
}

#[tokio::test]
async fn test_online_users_is_public() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/api/online-users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": [id], "count": 1 })))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::anonymous());
    let online = client.online_users().await.unwrap();
    assert_eq!(online.users, vec![id]);
    assert_eq!(online.count, 1);
}
