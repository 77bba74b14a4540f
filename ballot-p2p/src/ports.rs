use async_trait::async_trait;

use ballot_common::{NodeId, Proposal};

use crate::error::P2pError;

/// Outbound side: deliver one proposal to one peer, fire-and-forget.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, peer: &NodeId, proposal: &Proposal) -> Result<(), P2pError>;
}

/// Inbound side: whatever runs the roles of this process.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle_message(&self, from: NodeId, proposal: Proposal);
}
