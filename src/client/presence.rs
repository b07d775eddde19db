//! # Presence Client
//!
//! Keeps one logical connection to the server's presence channel and exposes
//! the latest online-user set.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle → Connecting → Connected → Disconnected → (Connecting | Idle)
//! ```
//!
//! - A failed connect or a dropped connection moves to `Disconnected`. While
//!   fewer than `max_attempts` reconnects have been made since the last
//!   successful open, the counter is incremented and a reconnect is scheduled
//!   after `policy.delay_for(counter)`. Otherwise the client settles in `Idle`.
//! - A successful open resets the counter to zero.
//! - `shutdown` (or dropping the client) closes the socket with code 1000 and
//!   cancels a pending reconnect.
//!
//! All of this runs in a single driver task. The reconnect timer is a sleep
//! inside that task, so it cannot outlive the client.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quillnest::client::{ClientConfig, PresenceClient, Session, WsConnector};
//!
//! # async fn example(session: Session) -> Result<(), quillnest::client::ClientError> {
//! let config = ClientConfig::from_env()?;
//! let client = PresenceClient::spawn(&config, &session, WsConnector)?;
//! let mut users = client.watch_online_users();
//! while users.changed().await.is_ok() {
//!     println!("{} online", users.borrow().len());
//! }
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::client::backoff::ReconnectPolicy;
use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::client::session::Session;
use crate::client::transport::{Connection, Connector, NORMAL_CLOSURE};
use crate::shared::presence::{decode_frame, DecodedFrame, PresenceFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    Disconnected,
}

/// Connection state plus the number of successful opens so far.
///
/// `epoch` tags outbound frames so a frame queued for one connection is never
/// written to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub epoch: u64,
}

#[derive(Debug)]
pub struct PresenceClient {
    status: watch::Receiver<ConnectionStatus>,
    users: watch::Receiver<Vec<Uuid>>,
    retries: watch::Receiver<u32>,
    outbound: mpsc::UnboundedSender<(u64, String)>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PresenceClient {
    /// Start connecting on behalf of `session`.
    ///
    /// Fails with `NotAuthenticated` when the session has no credential and
    /// with `NoRuntime` when called outside a tokio runtime.
    pub fn spawn<C: Connector>(
        config: &ClientConfig,
        session: &Session,
        connector: C,
    ) -> Result<Self, ClientError> {
        let token = session.token().ok_or(ClientError::NotAuthenticated)?;
        let runtime = Handle::try_current()?;

        let (status_tx, status_rx) = watch::channel(ConnectionStatus {
            state: ConnectionState::Idle,
            epoch: 0,
        });
        let (users_tx, users_rx) = watch::channel(Vec::new());
        let (retries_tx, retries_rx) = watch::channel(0);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let driver = Driver {
            connector,
            url: config.presence_url(token),
            auth_frame: config.auth_frame().then(|| PresenceFrame::auth(token)),
            policy: config.reconnect(),
            status: status_tx,
            users: users_tx,
            retries: retries_tx,
            outbound: outbound_rx,
            shutdown: shutdown_rx,
        };
        let task = runtime.spawn(driver.run());

        Ok(Self {
            status: status_rx,
            users: users_rx,
            retries: retries_rx,
            outbound: outbound_tx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.status.borrow().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Reconnects scheduled since the last successful open
    pub fn retry_count(&self) -> u32 {
        *self.retries.borrow()
    }

    /// Latest online-user set pushed by the server
    pub fn online_users(&self) -> Vec<Uuid> {
        self.users.borrow().clone()
    }

    pub fn watch_online_users(&self) -> watch::Receiver<Vec<Uuid>> {
        self.users.clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    pub fn watch_retries(&self) -> watch::Receiver<u32> {
        self.retries.clone()
    }

    /// Best-effort send.
    ///
    /// Returns `false` without touching the transport when not connected.
    pub fn send(&self, frame: &PresenceFrame) -> bool {
        let status = *self.status.borrow();
        if status.state != ConnectionState::Connected {
            tracing::warn!("[Presence] Not connected ({:?}); dropping outbound frame", status.state);
            return false;
        }
        match frame.to_text() {
            Ok(text) => self.outbound.send((status.epoch, text)).is_ok(),
            Err(e) => {
                tracing::warn!("[Presence] Failed to encode outbound frame: {}", e);
                false
            }
        }
    }

    /// Close the connection, cancel any pending reconnect and wait for the
    /// driver task to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("[Presence] Driver task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PresenceClient {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

enum Exit {
    Closed,
    Shutdown,
}

enum Event {
    Outbound(u64, String),
    Inbound(Option<Result<String, ClientError>>),
}

struct Driver<C: Connector> {
    connector: C,
    url: String,
    auth_frame: Option<PresenceFrame>,
    policy: ReconnectPolicy,
    status: watch::Sender<ConnectionStatus>,
    users: watch::Sender<Vec<Uuid>>,
    retries: watch::Sender<u32>,
    outbound: mpsc::UnboundedReceiver<(u64, String)>,
    shutdown: oneshot::Receiver<()>,
}

impl<C: Connector> Driver<C> {
    async fn run(mut self) {
        let mut attempts: u32 = 0;
        let mut epoch: u64 = 0;

        loop {
            self.set_state(ConnectionState::Connecting, epoch);
            tracing::debug!("[Presence] Connecting (attempt {})", attempts);

            let outcome = tokio::select! {
                _ = &mut self.shutdown => None,
                result = self.connector.connect(&self.url) => Some(result),
            };
            let Some(result) = outcome else {
                return self.stop(epoch);
            };

            match result {
                Ok(mut conn) => {
                    attempts = 0;
                    epoch += 1;
                    self.retries.send_replace(0);
                    self.set_state(ConnectionState::Connected, epoch);
                    tracing::info!("[Presence] Connected");

                    match self.pump(&mut conn, epoch).await {
                        Exit::Shutdown => {
                            conn.close(NORMAL_CLOSURE).await;
                            return self.stop(epoch);
                        }
                        Exit::Closed => tracing::info!("[Presence] Connection closed"),
                    }
                }
                Err(e) => tracing::warn!("[Presence] Connect failed: {}", e),
            }

            self.set_state(ConnectionState::Disconnected, epoch);
            self.discard_outbound();

            if !self.policy.allows(attempts) {
                tracing::info!("[Presence] Giving up after {} reconnect attempts", attempts);
                self.set_state(ConnectionState::Idle, epoch);
                return;
            }
            attempts += 1;
            self.retries.send_replace(attempts);
            let delay = self.policy.delay_for(attempts);
            tracing::info!(
                "[Presence] Reconnecting in {}ms (attempt {}/{})",
                delay.as_millis(),
                attempts,
                self.policy.max_attempts
            );

            let stopped = tokio::select! {
                _ = &mut self.shutdown => true,
                _ = tokio::time::sleep(delay) => false,
            };
            if stopped {
                return self.stop(epoch);
            }
        }
    }

    async fn pump(&mut self, conn: &mut C::Conn, epoch: u64) -> Exit {
        if let Some(frame) = &self.auth_frame {
            match frame.to_text() {
                Ok(text) => {
                    if let Err(e) = conn.send_text(text).await {
                        tracing::warn!("[Presence] Failed to send AUTH frame: {}", e);
                        return Exit::Closed;
                    }
                }
                Err(e) => tracing::warn!("[Presence] Failed to encode AUTH frame: {}", e),
            }
        }

        loop {
            let event = tokio::select! {
                _ = &mut self.shutdown => return Exit::Shutdown,
                Some((frame_epoch, text)) = self.outbound.recv() => Event::Outbound(frame_epoch, text),
                incoming = conn.next_text() => Event::Inbound(incoming),
            };

            match event {
                Event::Outbound(frame_epoch, _) if frame_epoch != epoch => {
                    tracing::debug!("[Presence] Dropping frame queued for an earlier connection");
                }
                Event::Outbound(_, text) => {
                    if let Err(e) = conn.send_text(text).await {
                        tracing::warn!("[Presence] Send failed: {}", e);
                        return Exit::Closed;
                    }
                }
                Event::Inbound(Some(Ok(text))) => self.handle_text(&text),
                Event::Inbound(Some(Err(e))) => {
                    tracing::warn!("[Presence] Transport error: {}", e);
                    return Exit::Closed;
                }
                Event::Inbound(None) => return Exit::Closed,
            }
        }
    }

    fn handle_text(&self, text: &str) {
        match decode_frame(text) {
            Ok(DecodedFrame::Frame(PresenceFrame::OnlineUsers { users })) => {
                tracing::debug!("[Presence] {} users online", users.len());
                self.users.send_replace(users);
            }
            Ok(DecodedFrame::Frame(frame)) => {
                tracing::debug!("[Presence] Ignoring unexpected frame: {:?}", frame);
            }
            Ok(DecodedFrame::Unrecognized(kind)) => {
                tracing::debug!("[Presence] Ignoring frame of kind {}", kind);
            }
            Err(e) => tracing::warn!("[Presence] Dropping malformed frame: {}", e),
        }
    }

    fn discard_outbound(&mut self) {
        let mut dropped = 0usize;
        while self.outbound.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::warn!("[Presence] Discarded {} unsent frames", dropped);
        }
    }

    fn set_state(&self, state: ConnectionState, epoch: u64) {
        self.status.send_replace(ConnectionStatus { state, epoch });
    }

    fn stop(&self, epoch: u64) {
        self.set_state(ConnectionState::Idle, epoch);
        tracing::info!("[Presence] Stopped");
    }
}
