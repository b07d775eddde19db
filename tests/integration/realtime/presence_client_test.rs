//! Presence client state machine tests
//!
//! The client runs against an in-memory transport with paused tokio time, so
//! reconnect delays are observed exactly and no test waits in real time.

#[path = "../../common/mod.rs"]
#[macro_use]
mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use common::{mock_transport, MockServer};
use pretty_assertions::assert_eq;
use quillnest::client::{
    ClientConfig, ClientError, ConnectionState, ConnectionStatus, PresenceClient, Session,
    SessionUser, NORMAL_CLOSURE,
};
use quillnest::shared::{AppConfig, PresenceFrame};
use tokio::sync::watch;
use tokio::time::Instant;
use uuid::Uuid;

fn config() -> ClientConfig {
    ClientConfig::with_builder(AppConfig::builder().server_url("http://127.0.0.1:3000")).unwrap()
}

fn session() -> Session {
    Session::new(
        "tok-1",
        SessionUser {
            id: Uuid::new_v4(),
            username: "alice".into(),
        },
    )
}

async fn wait_for_state(status: &mut watch::Receiver<ConnectionStatus>, state: ConnectionState) {
    assert_ok!(status.wait_for(|s| s.state == state).await);
}

/// Wait until the client has tried at least once and settled in `Idle`
async fn wait_until_given_up(status: &mut watch::Receiver<ConnectionStatus>, server: &MockServer) {
    assert_ok!(
        status
            .wait_for(|s| s.state == ConnectionState::Idle && server.attempt_count() > 0)
            .await
    );
}

#[tokio::test(start_paused = true)]
async fn test_requires_credential() {
    let (connector, server) = mock_transport();
    let result = PresenceClient::spawn(&config(), &Session::anonymous(), connector);
    assert_matches!(result, Err(ClientError::NotAuthenticated));
    assert_eq!(server.attempt_count(), 0);
}

#[test]
fn test_spawn_outside_runtime_fails() {
    let (connector, server) = mock_transport();
    let result = PresenceClient::spawn(&config(), &session(), connector);
    assert_matches!(result, Err(ClientError::NoRuntime(_)));
    assert_eq!(server.attempt_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_schedule_and_ceiling() {
    let (connector, server) = mock_transport();
    server.refuse_all();

    let client = PresenceClient::spawn(&config(), &session(), connector).unwrap();
    let mut status = client.watch_status();
    wait_until_given_up(&mut status, &server).await;

    // Initial attempt plus five reconnects
    let times = server.attempt_times();
    assert_eq!(times.len(), 6);
    let expected = [2000, 4000, 8000, 10000, 10000];
    for (pair, ms) in times.windows(2).zip(expected) {
        assert_delay!(pair[1] - pair[0], ms);
    }
    assert_eq!(client.retry_count(), 5);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(server.attempt_count(), 6);
    assert_eq!(client.state(), ConnectionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_successful_open_resets_counter() {
    let (connector, mut server) = mock_transport();
    server.refuse_next(2);

    let client = PresenceClient::spawn(&config(), &session(), connector).unwrap();
    let mut status = client.watch_status();

    let peer = server.accept().await;
    wait_for_state(&mut status, ConnectionState::Connected).await;
    assert_eq!(server.attempt_count(), 3);
    assert_eq!(client.retry_count(), 0);

    let dropped_at = Instant::now();
    drop(peer);

    // First reconnect after an open waits the attempt-one delay again
    let _peer = server.accept().await;
    let times = server.attempt_times();
    assert_eq!(times.len(), 4);
    assert_delay!(times[3] - dropped_at, 2000);

    wait_for_state(&mut status, ConnectionState::Connected).await;
    assert_eq!(client.retry_count(), 0);
    assert_eq!(status.borrow().epoch, 2);
}

#[tokio::test(start_paused = true)]
async fn test_token_in_url_and_optional_auth_frame() {
    let (connector, mut server) = mock_transport();
    let config = config().with_auth_frame(true);

    let client = PresenceClient::spawn(&config, &session(), connector).unwrap();
    let mut peer = server.accept().await;

    assert_eq!(server.attempt_urls(), vec!["ws://127.0.0.1:3000/ws?token=tok-1".to_string()]);
    assert_eq!(
        peer.from_client.recv().await.unwrap(),
        r#"{"type":"AUTH","token":"tok-1"}"#
    );
    drop(client);
}

#[tokio::test(start_paused = true)]
async fn test_send_only_while_connected() {
    let (connector, mut server) = mock_transport();
    server.refuse_all();
    let frame = PresenceFrame::online_users(vec![]);

    let client = PresenceClient::spawn(&config(), &session(), connector).unwrap();
    assert!(!client.send(&frame));

    let mut retries = client.watch_retries();
    assert_ok!(retries.wait_for(|n| *n >= 1).await);
    assert!(!client.send(&frame));

    server.accept_all();
    let mut peer = server.accept().await;
    let mut status = client.watch_status();
    wait_for_state(&mut status, ConnectionState::Connected).await;

    assert!(client.send(&frame));
    assert_eq!(peer.from_client.recv().await.unwrap(), frame.to_text().unwrap());

    drop(peer);
    assert_ok!(status.wait_for(|s| s.state != ConnectionState::Connected).await);
    assert!(!client.send(&frame));

    let mut next = server.accept().await;
    wait_for_state(&mut status, ConnectionState::Connected).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(next.from_client.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_while_connected() {
    let (connector, mut server) = mock_transport();

    let client = PresenceClient::spawn(&config(), &session(), connector).unwrap();
    let peer = server.accept().await;
    let mut status = client.watch_status();
    wait_for_state(&mut status, ConnectionState::Connected).await;

    client.shutdown().await;
    assert!(peer.closed_by_client());
    assert_eq!(peer.close_code(), Some(NORMAL_CLOSURE));
    assert_eq!(NORMAL_CLOSURE, 1000);
    assert_eq!(status.borrow().state, ConnectionState::Idle);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(server.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pending_reconnect() {
    let (connector, server) = mock_transport();
    server.refuse_all();

    let client = PresenceClient::spawn(&config(), &session(), connector).unwrap();
    let mut retries = client.watch_retries();
    assert_ok!(retries.wait_for(|n| *n == 1).await);

    client.shutdown().await;
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(server.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_reconnect() {
    let (connector, server) = mock_transport();
    server.refuse_all();

    let client = PresenceClient::spawn(&config(), &session(), connector).unwrap();
    let mut retries = client.watch_retries();
    assert_ok!(retries.wait_for(|n| *n == 1).await);

    drop(client);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(server.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_online_users_updates_and_malformed_frames() {
    let (connector, mut server) = mock_transport();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let client = PresenceClient::spawn(&config(), &session(), connector).unwrap();
    let mut users = client.watch_online_users();
    let peer = server.accept().await;

    peer.push(&PresenceFrame::online_users(vec![alice]));
    assert_ok!(users.changed().await);
    assert_eq!(*users.borrow_and_update(), vec![alice]);

    peer.push_raw("not json at all");
    peer.push_raw(r#"{"users":[]}"#);
    peer.push_raw(r#"{"type":"ONLINE_USERS","users":"everyone"}"#);
    peer.push_raw(r#"{"type":"TYPING","user":"x"}"#);
    peer.push(&PresenceFrame::auth("echo"));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!users.has_changed().unwrap());
    assert_eq!(client.online_users(), vec![alice]);
    assert!(client.is_connected());

    peer.push(&PresenceFrame::online_users(vec![alice, bob]));
    assert_ok!(users.changed().await);
    assert_eq!(*users.borrow_and_update(), vec![alice, bob]);

    // An empty set is a valid update
    peer.push(&PresenceFrame::online_users(vec![]));
    assert_ok!(users.changed().await);
    assert!(users.borrow().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_users_retained_while_disconnected() {
    let (connector, mut server) = mock_transport();
    let alice = Uuid::new_v4();

    let client = PresenceClient::spawn(&config(), &session(), connector).unwrap();
    let mut users = client.watch_online_users();
    let mut status = client.watch_status();
    let peer = server.accept().await;
    server.refuse_all();

    peer.push(&PresenceFrame::online_users(vec![alice]));
    assert_ok!(users.changed().await);

    drop(peer);
    assert_ok!(status.wait_for(|s| s.state != ConnectionState::Connected).await);
    assert_eq!(client.online_users(), vec![alice]);
}
