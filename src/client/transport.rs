//! # Presence Transport
//!
//! The presence client talks to the network through two small traits so the
//! connection state machine can be driven without a socket:
//!
//! - [`Connector`] opens a connection to a URL
//! - [`Connection`] sends and receives text frames and closes
//!
//! [`WsConnector`] is the production implementation over tokio-tungstenite.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::client::error::ClientError;

/// Opens presence connections
pub trait Connector: Send + Sync + 'static {
    type Conn: Connection;

    fn connect(&self, url: &str) -> impl Future<Output = Result<Self::Conn, ClientError>> + Send;
}

/// An open presence connection
pub trait Connection: Send + 'static {
    /// Send one text frame
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Next inbound text frame; `None` once the peer has closed.
    ///
    /// Must be cancel-safe: the presence driver races it against other events.
    fn next_text(&mut self) -> impl Future<Output = Option<Result<String, ClientError>>> + Send;

    /// Close with the given WebSocket close code
    fn close(&mut self, code: u16) -> impl Future<Output = ()> + Send;
}

/// Close code sent on an orderly shutdown
pub const NORMAL_CLOSURE: u16 = 1000;

/// WebSocket connector over tokio-tungstenite
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    type Conn = WsConnection;

    async fn connect(&self, url: &str) -> Result<WsConnection, ClientError> {
        let (stream, response) = tokio_tungstenite::connect_async(url).await?;
        tracing::debug!("[Presence] Handshake completed with status {}", response.status());
        Ok(WsConnection { stream })
    }
}

pub struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connection for WsConnection {
    async fn send_text(&mut self, text: String) -> Result<(), ClientError> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn next_text(&mut self) -> Option<Result<String, ClientError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.as_str().to_owned())),
                Ok(Message::Close(frame)) => {
                    tracing::debug!("[Presence] Server closed the socket: {:?}", frame);
                    return None;
                }
                Ok(Message::Binary(data)) => {
                    tracing::warn!("[Presence] Ignoring {} byte binary frame", data.len());
                }
                // Ping/pong are answered by tungstenite itself
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
        }
    }

    async fn close(&mut self, code: u16) {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: "client shutdown".into(),
        };
        if let Err(e) = self.stream.close(Some(frame)).await {
            tracing::debug!("[Presence] Close handshake failed: {}", e);
        }
    }
}
