pub mod consensus;
pub mod registry;

pub use consensus::evaluator::{quorum_threshold, ConsensusEvaluator};
pub use consensus::proposer::ProposerPhase;
pub use consensus::ConsensusEngine;
pub use registry::RoleRegistry;
