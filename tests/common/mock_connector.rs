//! In-memory presence transport
//!
//! `MockConnector` records every connect attempt and either refuses it or
//! hands a `MockPeer` to the test, which then plays the server side of the
//! connection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use quillnest::client::{ClientError, Connection, Connector};
use quillnest::shared::PresenceFrame;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Clone)]
pub struct MockConnector {
    attempts: Arc<Mutex<Vec<(Instant, String)>>>,
    refusals: Arc<AtomicUsize>,
    peers: mpsc::UnboundedSender<MockPeer>,
}

/// Test-side handle of a `MockConnector`
pub struct MockServer {
    attempts: Arc<Mutex<Vec<(Instant, String)>>>,
    refusals: Arc<AtomicUsize>,
    peers: mpsc::UnboundedReceiver<MockPeer>,
}

pub fn mock_transport() -> (MockConnector, MockServer) {
    let attempts = Arc::new(Mutex::new(Vec::new()));
    let refusals = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::unbounded_channel();
    (
        MockConnector {
            attempts: attempts.clone(),
            refusals: refusals.clone(),
            peers: tx,
        },
        MockServer {
            attempts,
            refusals,
            peers: rx,
        },
    )
}

impl MockServer {
    /// Refuse the next `n` connects
    pub fn refuse_next(&self, n: usize) {
        self.refusals.store(n, Ordering::SeqCst);
    }

    /// Refuse every connect from now on
    pub fn refuse_all(&self) {
        self.refuse_next(usize::MAX);
    }

    pub fn accept_all(&self) {
        self.refuse_next(0);
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn attempt_times(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    pub fn attempt_urls(&self) -> Vec<String> {
        self.attempts.lock().unwrap().iter().map(|(_, url)| url.clone()).collect()
    }

    /// Wait for the next accepted connection
    pub async fn accept(&mut self) -> MockPeer {
        self.peers.recv().await.expect("connector dropped")
    }
}

impl Connector for MockConnector {
    type Conn = MockConnection;

    async fn connect(&self, url: &str) -> Result<MockConnection, ClientError> {
        self.attempts
            .lock()
            .unwrap()
            .push((Instant::now(), url.to_string()));

        let refused = self
            .refusals
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok();
        if refused {
            return Err(ClientError::Closed);
        }

        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        let closed = Arc::new(Mutex::new(None));
        self.peers
            .send(MockPeer {
                to_client,
                from_client,
                closed: closed.clone(),
            })
            .map_err(|_| ClientError::Closed)?;

        Ok(MockConnection {
            inbound,
            outbound,
            closed,
        })
    }
}

pub struct MockConnection {
    inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
    closed: Arc<Mutex<Option<u16>>>,
}

impl Connection for MockConnection {
    async fn send_text(&mut self, text: String) -> Result<(), ClientError> {
        self.outbound.send(text).map_err(|_| ClientError::Closed)
    }

    async fn next_text(&mut self) -> Option<Result<String, ClientError>> {
        self.inbound.recv().await.map(Ok)
    }

    async fn close(&mut self, code: u16) {
        *self.closed.lock().unwrap() = Some(code);
    }
}

/// Server side of one accepted connection; dropping it closes the connection
pub struct MockPeer {
    to_client: mpsc::UnboundedSender<String>,
    pub from_client: mpsc::UnboundedReceiver<String>,
    closed: Arc<Mutex<Option<u16>>>,
}

impl MockPeer {
    pub fn push(&self, frame: &PresenceFrame) {
        self.push_raw(&frame.to_text().unwrap());
    }

    pub fn push_raw(&self, text: &str) {
        let _ = self.to_client.send(text.to_string());
    }

    /// Whether the client closed the connection itself
    pub fn closed_by_client(&self) -> bool {
        self.close_code().is_some()
    }

    /// Close code the client sent, if it closed
    pub fn close_code(&self) -> Option<u16> {
        *self.closed.lock().unwrap()
    }
}
