use std::io;

use thiserror::Error;

use ballot_common::{BallotError, NodeId};

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum P2pError {
    #[error("Failed to connect to peer {peer}: {source}")]
    Connect { peer: NodeId, source: io::Error },

    #[error("Failed to send to peer {peer}: {source}")]
    Send { peer: NodeId, source: io::Error },

    #[error("Failed to read from {addr}: {source}")]
    Receive { addr: String, source: io::Error },

    #[error("Message from {0} exceeds {1} bytes")]
    Oversized(String, u64),

    #[error("Peer {0} not found")]
    PeerNotFound(NodeId),

    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl From<P2pError> for BallotError {
    fn from(err: P2pError) -> Self {
        match err {
            P2pError::Codec(e) => BallotError::Decode(e.to_string()),
            other => BallotError::Transport(other.to_string()),
        }
    }
}
