//! Shared application state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the in-memory marker set and the registry of connected push
//! clients. There is no persistence: the set lives and dies with the
//! process.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use bridge::ids::UuidIds;
use bridge::{Marker, MarkerDraft, MarkerId, ServerPush};

/// Shared state, Clone for Axum — all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    markers: Arc<RwLock<HashMap<MarkerId, Marker>>>,
    /// Connected push clients: `client_id` -> sender for outgoing envelopes.
    clients: Arc<RwLock<HashMap<Uuid, mpsc::Sender<ServerPush>>>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            markers: Arc::new(RwLock::new(HashMap::new())),
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Current marker list, sorted by id for a stable response body.
    pub async fn snapshot(&self) -> Vec<Marker> {
        let markers = self.markers.read().await;
        let mut list: Vec<Marker> = markers.values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    /// Replace the stored set with an uploaded batch, assigning ids to
    /// entries that lack one.
    pub async fn replace(&self, batch: Vec<MarkerDraft>) {
        let mut ids = UuidIds;
        let mut markers = self.markers.write().await;
        markers.clear();
        for draft in batch {
            let marker = draft.resolve(&mut ids);
            markers.insert(marker.id.clone(), marker);
        }
    }

    /// Register a push client and return its id.
    pub async fn subscribe(&self, sender: mpsc::Sender<ServerPush>) -> Uuid {
        let client_id = Uuid::new_v4();
        self.clients.write().await.insert(client_id, sender);
        client_id
    }

    /// Remove a departed push client.
    pub async fn unsubscribe(&self, client_id: Uuid) {
        self.clients.write().await.remove(&client_id);
    }

    /// Deliver an envelope to every connected push client, pruning the
    /// ones whose channel is gone.
    pub async fn broadcast(&self, push: &ServerPush) {
        let mut dead = Vec::new();
        {
            let clients = self.clients.read().await;
            for (client_id, sender) in clients.iter() {
                match sender.try_send(push.clone()) {
                    Ok(()) => {}
                    // Best-effort: a full channel means a slow consumer;
                    // skip this envelope rather than stall every client.
                    Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => dead.push(*client_id),
                }
            }
        }
        if !dead.is_empty() {
            let mut clients = self.clients.write().await;
            for client_id in dead {
                clients.remove(&client_id);
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
