//! Presence socket tests against a real listener
//!
//! Each test binds its own server on an ephemeral port with no database.

#[path = "../../common/mod.rs"]
#[macro_use]
mod common;

use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use assert_matches::assert_matches;
use common::{test_config, test_user};
use futures_util::{SinkExt, StreamExt};
use quillnest::backend::routes::create_router;
use quillnest::backend::server::AppState;
use quillnest::client::{ClientConfig, PresenceClient, Session, SessionUser, WsConnector};
use quillnest::shared::social::OnlineUsersResponse;
use quillnest::shared::{decode_frame, AppConfig, DecodedFrame, PresenceFrame};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(test_config(), None));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr, token: Option<&str>) -> Result<Socket, WsError> {
    let url = match token {
        Some(token) => format!("ws://{}/ws?token={}", addr, token),
        None => format!("ws://{}/ws", addr),
    };
    tokio_tungstenite::connect_async(url).await.map(|(socket, _)| socket)
}

/// Next ONLINE_USERS frame as a set
async fn next_users(socket: &mut Socket) -> HashSet<Uuid> {
    loop {
        let message = assert_ok!(timeout(WAIT, socket.next()).await, "no frame in time")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = message {
            match decode_frame(text.as_str()).unwrap() {
                DecodedFrame::Frame(PresenceFrame::OnlineUsers { users }) => {
                    return users.into_iter().collect()
                }
                other => panic!("unexpected frame: {:?}", other),
            }
        }
    }
}

#[tokio::test]
async fn test_query_token_joins_and_broadcasts() {
    let addr = spawn_server().await;
    let (alice, alice_token) = test_user("alice");
    let (bob, bob_token) = test_user("bob");

    let mut alice_ws = connect(addr, Some(&alice_token)).await.unwrap();
    assert_eq!(next_users(&mut alice_ws).await, HashSet::from([alice]));

    let mut bob_ws = connect(addr, Some(&bob_token)).await.unwrap();
    assert_eq!(next_users(&mut bob_ws).await, HashSet::from([alice, bob]));
    assert_eq!(next_users(&mut alice_ws).await, HashSet::from([alice, bob]));

    bob_ws.close(None).await.unwrap();
    assert_eq!(next_users(&mut alice_ws).await, HashSet::from([alice]));
}

#[tokio::test]
async fn test_second_socket_of_same_user_gets_snapshot() {
    let addr = spawn_server().await;
    let (alice, token) = test_user("alice");

    let mut first = connect(addr, Some(&token)).await.unwrap();
    assert_eq!(next_users(&mut first).await, HashSet::from([alice]));

    let mut second = connect(addr, Some(&token)).await.unwrap();
    assert_eq!(next_users(&mut second).await, HashSet::from([alice]));

    // Closing one of two sockets keeps the user online
    second.close(None).await.unwrap();
    let (bob, bob_token) = test_user("bob");
    let _bob_ws = connect(addr, Some(&bob_token)).await.unwrap();
    assert_eq!(next_users(&mut first).await, HashSet::from([alice, bob]));
}

#[tokio::test]
async fn test_bad_query_token_is_rejected_before_upgrade() {
    let addr = spawn_server().await;
    let err = connect(addr, Some("not-a-jwt")).await.unwrap_err();
    assert_matches!(err, WsError::Http(response) if response.status() == 401);
}

#[tokio::test]
async fn test_auth_frame_authenticates() {
    let addr = spawn_server().await;
    let (alice, token) = test_user("alice");

    let mut socket = connect(addr, None).await.unwrap();
    socket
        .send(Message::text(PresenceFrame::auth(token).to_text().unwrap()))
        .await
        .unwrap();
    assert_eq!(next_users(&mut socket).await, HashSet::from([alice]));
}

#[tokio::test]
async fn test_non_auth_first_frame_closes_with_policy_violation() {
    let addr = spawn_server().await;

    let mut socket = connect(addr, None).await.unwrap();
    socket
        .send(Message::text(r#"{"type":"ONLINE_USERS","users":[]}"#))
        .await
        .unwrap();

    let message = assert_ok!(timeout(WAIT, socket.next()).await)
        .expect("socket closed without a frame")
        .unwrap();
    assert_matches!(message, Message::Close(Some(frame)) if frame.code == CloseCode::Policy);
}

#[tokio::test]
async fn test_invalid_auth_frame_token_closes() {
    let addr = spawn_server().await;

    let mut socket = connect(addr, None).await.unwrap();
    socket
        .send(Message::text(PresenceFrame::auth("forged").to_text().unwrap()))
        .await
        .unwrap();

    let message = assert_ok!(timeout(WAIT, socket.next()).await)
        .expect("socket closed without a frame")
        .unwrap();
    assert_matches!(message, Message::Close(Some(frame)) if frame.code == CloseCode::Policy);
}

#[tokio::test]
async fn test_malformed_frames_after_auth_are_ignored() {
    let addr = spawn_server().await;
    let (alice, alice_token) = test_user("alice");
    let (bob, bob_token) = test_user("bob");

    let mut alice_ws = connect(addr, Some(&alice_token)).await.unwrap();
    assert_eq!(next_users(&mut alice_ws).await, HashSet::from([alice]));
    alice_ws.send(Message::text("{{{")).await.unwrap();

    let _bob_ws = connect(addr, Some(&bob_token)).await.unwrap();
    assert_eq!(next_users(&mut alice_ws).await, HashSet::from([alice, bob]));
}

#[tokio::test]
async fn test_online_users_endpoint() {
    let addr = spawn_server().await;
    let (alice, token) = test_user("alice");

    let mut socket = connect(addr, Some(&token)).await.unwrap();
    next_users(&mut socket).await;

    let body: OnlineUsersResponse = reqwest::get(format!("http://{}/api/online-users", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.users, vec![alice]);
    assert_eq!(body.count, 1);
}

#[tokio::test]
async fn test_presence_client_end_to_end() {
    let addr = spawn_server().await;
    let (alice, token) = test_user("alice");

    let config =
        ClientConfig::with_builder(AppConfig::builder().server_url(format!("http://{}", addr)))
            .unwrap();
    let session = Session::new(
        token,
        SessionUser {
            id: alice,
            username: "alice".into(),
        },
    );

    let client = PresenceClient::spawn(&config, &session, WsConnector).unwrap();
    let mut users = client.watch_online_users();
    assert_ok!(timeout(WAIT, users.wait_for(|users| users.contains(&alice))).await).unwrap();
    assert!(client.is_connected());

    client.shutdown().await;
}
