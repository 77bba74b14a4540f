//! consensus
//!
//! Single-phase Paxos-style vote. A proposer broadcasts one proposal to its
//! acceptors, each acceptor answers with the highest-id proposal it has ever
//! accepted, and once a quorum of identical answers comes back the proposer
//! tells its learners.
//!
//! There is no prepare/promise round and no NACK; with several competing
//! proposers the learners are not guaranteed to agree.

pub mod acceptor;
mod engine;
pub mod evaluator;
pub mod learner;
pub mod proposer;
pub mod votes;

pub use engine::ConsensusEngine;
