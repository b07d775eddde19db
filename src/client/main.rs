/**
 * Quillnest Presence Client
 *
 * Keeps a presence connection open for the stored session and logs the
 * online-user list every time the server pushes it.
 *
 * The session comes from `QUILLNEST_TOKEN` when set, otherwise from the
 * session file written by a previous login.
 */

use quillnest::client::{
    ClientConfig, ClientError, ConnectionState, PresenceClient, Session, SessionStore, SessionUser,
    WsConnector,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = ClientConfig::from_env()?;
    let session = load_session()?;
    if !session.is_authenticated() {
        tracing::error!("[Presence] No session found; log in first or set QUILLNEST_TOKEN");
        return Err(ClientError::NotAuthenticated.into());
    }

    let client = PresenceClient::spawn(&config, &session, WsConnector)?;
    let mut users = client.watch_online_users();
    let mut status = client.watch_status();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("[Presence] Received Ctrl+C, shutting down");
                break;
            }
            changed = users.changed() => {
                if changed.is_err() {
                    break;
                }
                let online = users.borrow_and_update().clone();
                tracing::info!("[Presence] {} online: {:?}", online.len(), online);
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = status.borrow_and_update().state;
                tracing::info!("[Presence] State: {:?}", state);
                if state == ConnectionState::Idle {
                    tracing::warn!("[Presence] Connection gave up; exiting");
                    break;
                }
            }
        }
    }

    client.shutdown().await;
    Ok(())
}

fn load_session() -> Result<Session, ClientError> {
    if let Ok(token) = std::env::var("QUILLNEST_TOKEN") {
        let user = SessionUser {
            id: Uuid::nil(),
            username: std::env::var("QUILLNEST_USER").unwrap_or_default(),
        };
        return Ok(Session::new(token, user));
    }
    match SessionStore::default_location() {
        Some(store) => store.load(),
        None => Ok(Session::anonymous()),
    }
}
