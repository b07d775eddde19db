/**
 * Presence Registry
 *
 * Counts live presence sockets per user. A user is online while at least one
 * of their sockets is open. Whenever the online set changes the full sorted
 * list is broadcast as an `ONLINE_USERS` frame to every subscribed socket.
 *
 * Broadcasts are sent while the map lock is held, so subscribers see set
 * changes in the order they happened.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::PresenceFrame;

/// Frames buffered per subscriber before it counts as lagged
const BROADCAST_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct PresenceRegistry {
    sockets: Arc<Mutex<HashMap<Uuid, usize>>>,
    updates: broadcast::Sender<PresenceFrame>,
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceRegistry {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            sockets: Arc::new(Mutex::new(HashMap::new())),
            updates,
        }
    }

    /// Receive every future change of the online set
    pub fn subscribe(&self) -> broadcast::Receiver<PresenceFrame> {
        self.updates.subscribe()
    }

    /// Register one socket for `user`; true when the user just came online
    pub fn join(&self, user: Uuid) -> bool {
        let mut sockets = self.lock();
        let count = sockets.entry(user).or_insert(0);
        *count += 1;
        let changed = *count == 1;
        if changed {
            tracing::info!("[Presence] {} online ({} total)", user, sockets.len());
            self.publish(&sockets);
        }
        changed
    }

    /// Unregister one socket for `user`; true when the user went offline
    pub fn leave(&self, user: Uuid) -> bool {
        let mut sockets = self.lock();
        let Some(count) = sockets.get_mut(&user) else {
            return false;
        };
        *count -= 1;
        if *count > 0 {
            return false;
        }
        sockets.remove(&user);
        tracing::info!("[Presence] {} offline ({} total)", user, sockets.len());
        self.publish(&sockets);
        true
    }

    /// Sorted list of online users
    pub fn online_users(&self) -> Vec<Uuid> {
        sorted_users(&self.lock())
    }

    /// Current set as a frame
    pub fn snapshot(&self) -> PresenceFrame {
        PresenceFrame::online_users(self.online_users())
    }

    fn publish(&self, sockets: &HashMap<Uuid, usize>) {
        let frame = PresenceFrame::online_users(sorted_users(sockets));
        match self.updates.send(frame) {
            Ok(receivers) => tracing::debug!("[Presence] Broadcast to {} sockets", receivers),
            Err(_) => tracing::debug!("[Presence] No sockets subscribed"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, usize>> {
        self.sockets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sorted_users(sockets: &HashMap<Uuid, usize>) -> Vec<Uuid> {
    let mut users: Vec<Uuid> = sockets.keys().copied().collect();
    users.sort();
    users
}
