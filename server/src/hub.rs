//! Outbound side of every connection
//!
//! The hub maps player ids to the channel feeding that connection's writer
//! task. It is built once in `main` and handed to the engine; nothing else
//! holds a route to the clients.

use log::warn;
use shared::{PlayerId, ServerMessage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::{mpsc, RwLock};

pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

pub struct ClientHub {
    clients: RwLock<HashMap<PlayerId, ClientSender>>,
    next_player_id: AtomicU32,
}

impl ClientHub {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            next_player_id: AtomicU32::new(1),
        }
    }

    /// Hands out a fresh session id, never reused within the process
    pub fn next_player_id(&self) -> PlayerId {
        self.next_player_id.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn register(&self, id: PlayerId, sender: ClientSender) {
        self.clients.write().await.insert(id, sender);
    }

    pub async fn unregister(&self, id: PlayerId) -> bool {
        self.clients.write().await.remove(&id).is_some()
    }

    /// Sends to a single connection, returns false if it is gone
    pub async fn send_to(&self, id: PlayerId, message: ServerMessage) -> bool {
        let delivered = {
            let clients = self.clients.read().await;
            match clients.get(&id) {
                Some(sender) => sender.send(message).is_ok(),
                None => return false,
            }
        };

        if !delivered {
            warn!("Connection of player {} is closed, dropping it", id);
            self.unregister(id).await;
        }
        delivered
    }

    /// Sends to every connection, returns how many accepted the message
    pub async fn broadcast(&self, message: ServerMessage) -> usize {
        let (total, dead) = {
            let clients = self.clients.read().await;
            let dead: Vec<PlayerId> = clients
                .iter()
                .filter(|(_, sender)| sender.send(message.clone()).is_err())
                .map(|(id, _)| *id)
                .collect();
            (clients.len(), dead)
        };

        let delivered = total - dead.len();
        if !dead.is_empty() {
            let mut clients = self.clients.write().await;
            for id in &dead {
                warn!("Connection of player {} is closed, dropping it", id);
                clients.remove(id);
            }
        }
        delivered
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }
}

impl Default for ClientHub {
    fn default() -> Self {
        Self::new()
    }
}
