//! Channel-backed transport for running several nodes in one process.
//!
//! Messages still go through the wire codec, so a node driven over this
//! network sees exactly what it would see over TCP.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::{
    sync::{mpsc, RwLock},
    task::JoinHandle,
};
use tracing::warn;

use ballot_common::{NodeId, Proposal};

use crate::{
    codec,
    error::P2pError,
    ports::{MessageHandler, Transport},
};

type Inbox = mpsc::UnboundedSender<(NodeId, Vec<u8>)>;

#[derive(Clone, Default)]
pub struct InMemoryNetwork {
    routes: Arc<RwLock<HashMap<NodeId, Inbox>>>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sending half bound to `id` as the sender name.
    pub fn transport(&self, id: NodeId) -> InMemoryTransport {
        InMemoryTransport {
            id,
            network: self.clone(),
        }
    }

    /// Registers `id` and starts delivering its inbox to `handler`, one task
    /// per message as the TCP listener does per connection.
    pub async fn attach(&self, id: NodeId, handler: Arc<dyn MessageHandler>) -> JoinHandle<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<(NodeId, Vec<u8>)>();
        self.routes.write().await.insert(id.clone(), tx);

        tokio::spawn(async move {
            while let Some((from, bytes)) = rx.recv().await {
                let handler = Arc::clone(&handler);
                let to = id.clone();
                tokio::spawn(async move {
                    match codec::decode(&bytes) {
                        Ok(proposal) => handler.handle_message(from, proposal).await,
                        Err(e) => warn!("[{}] dropping message from {}: {}", to, from, e),
                    }
                });
            }
        })
    }

    /// Drops the route to `id`; later sends to it fail with `PeerNotFound`.
    pub async fn detach(&self, id: &NodeId) {
        self.routes.write().await.remove(id);
    }

    pub async fn connected_peers(&self) -> Vec<NodeId> {
        self.routes.read().await.keys().cloned().collect()
    }
}

#[derive(Clone)]
pub struct InMemoryTransport {
    id: NodeId,
    network: InMemoryNetwork,
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, peer: &NodeId, proposal: &Proposal) -> Result<(), P2pError> {
        let inbox = self
            .network
            .routes
            .read()
            .await
            .get(peer)
            .cloned()
            .ok_or_else(|| P2pError::PeerNotFound(peer.clone()))?;

        inbox
            .send((self.id.clone(), codec::encode(proposal)))
            .map_err(|_| P2pError::PeerNotFound(peer.clone()))
    }
}
