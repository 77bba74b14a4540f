use thiserror::Error;

/// Errors surfaced by every layer of a ballot node.
///
/// None of them is fatal once the node is running: the operation that hit
/// the error is logged and dropped.
#[derive(Debug, Error)]
pub enum BallotError {
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Consensus error: {0}")]
    Consensus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BallotError>;
