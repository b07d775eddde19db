/**
 * Presence Socket Handler
 *
 * `GET /ws` upgrades to a WebSocket that streams the online-user set.
 *
 * Authentication:
 * - `?token=<jwt>` is verified before the upgrade; a bad token is a 401.
 * - Without a query token the first text frame must be
 *   `{"type":"AUTH","token":…}` within 10 seconds, otherwise the socket is
 *   closed with code 1008 (policy violation).
 *
 * Once authenticated the socket is registered with the `PresenceRegistry`
 * and receives every `ONLINE_USERS` broadcast. Inbound frames after
 * authentication carry no meaning; malformed ones are logged and dropped.
 */

use std::time::Duration;

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{Json, Response};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::backend::auth::sessions::user_id_from_token;
use crate::backend::error::BackendResult;
use crate::backend::realtime::presence::PresenceRegistry;
use crate::backend::server::state::AppState;
use crate::shared::social::OnlineUsersResponse;
use crate::shared::{decode_frame, DecodedFrame, PresenceFrame};

/// How long an unauthenticated socket may wait before sending AUTH
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
pub struct PresenceQuery {
    pub token: Option<String>,
}

pub async fn presence_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<PresenceQuery>,
) -> BackendResult<Response> {
    let user = match query.token.as_deref() {
        Some(token) => Some(user_id_from_token(token, &state.config.jwt_secret)?),
        None => None,
    };
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

/// `GET /api/online-users`
pub async fn online_users(State(presence): State<PresenceRegistry>) -> Json<OnlineUsersResponse> {
    let users = presence.online_users();
    Json(OnlineUsersResponse {
        count: users.len(),
        users,
    })
}

async fn handle_socket(socket: WebSocket, state: AppState, user: Option<Uuid>) {
    let (mut sender, mut receiver) = socket.split();

    let user_id = match user {
        Some(id) => id,
        None => match tokio::time::timeout(AUTH_TIMEOUT, await_auth(&mut receiver, &state)).await {
            Ok(Some(id)) => id,
            Ok(None) => return reject(&mut sender, "authentication failed").await,
            Err(_) => {
                tracing::warn!("[Presence] No AUTH frame within {:?}", AUTH_TIMEOUT);
                return reject(&mut sender, "authentication timeout").await;
            }
        },
    };

    // Subscribe before joining so our own join broadcast is not missed
    let mut updates = state.presence.subscribe();
    if !state.presence.join(user_id) && send_frame(&mut sender, &state.presence.snapshot()).await.is_err() {
        state.presence.leave(user_id);
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => {
                let frame = match update {
                    Ok(frame) => frame,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("[Presence] Socket for {} lagged by {} updates", user_id, skipped);
                        state.presence.snapshot()
                    }
                    Err(RecvError::Closed) => break,
                };
                if send_frame(&mut sender, &frame).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => match decode_frame(text.as_str()) {
                    Ok(frame) => tracing::debug!("[Presence] Ignoring inbound frame from {}: {:?}", user_id, frame),
                    Err(e) => tracing::warn!("[Presence] Dropping malformed frame from {}: {}", user_id, e),
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!("[Presence] Socket error for {}: {}", user_id, e);
                    break;
                }
            },
        }
    }

    state.presence.leave(user_id);
    tracing::debug!("[Presence] Socket for {} closed", user_id);
}

/// Wait for the AUTH frame; `None` when the socket closes or sends anything else
async fn await_auth(receiver: &mut SplitStream<WebSocket>, state: &AppState) -> Option<Uuid> {
    while let Some(message) = receiver.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        };
        return match decode_frame(text.as_str()) {
            Ok(DecodedFrame::Frame(PresenceFrame::Auth { token })) => {
                user_id_from_token(&token, &state.config.jwt_secret).ok()
            }
            Ok(other) => {
                tracing::warn!("[Presence] Expected AUTH frame, got {:?}", other);
                None
            }
            Err(e) => {
                tracing::warn!("[Presence] Malformed AUTH frame: {}", e);
                None
            }
        };
    }
    None
}

async fn reject(sender: &mut SplitSink<WebSocket, Message>, reason: &'static str) {
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: reason.into(),
    };
    if let Err(e) = sender.send(Message::Close(Some(frame))).await {
        tracing::debug!("[Presence] Failed to send close frame: {}", e);
    }
}

async fn send_frame(
    sender: &mut SplitSink<WebSocket, Message>,
    frame: &PresenceFrame,
) -> Result<(), axum::Error> {
    let text = match frame.to_text() {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("[Presence] Failed to encode frame: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(text.into())).await
}
