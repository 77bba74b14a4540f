use std::fmt;

use ballot_common::{BallotError, NodeId, Proposal, Result};

use super::{evaluator::ConsensusEvaluator, votes::VoteTally};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposerPhase {
    Idle,
    Proposing,
    AwaitingVotes,
    Decided,
}

impl fmt::Display for ProposerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProposerPhase::Idle => "idle",
            ProposerPhase::Proposing => "proposing",
            ProposerPhase::AwaitingVotes => "awaiting-votes",
            ProposerPhase::Decided => "decided",
        };
        f.write_str(s)
    }
}

/// Result of feeding one acceptor answer to the proposer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// No round is open; the answer was not counted.
    Ignored,
    Counted {
        /// Tally of the answered proposal after this vote.
        votes: usize,
        /// Proposals whose tally reached quorum with this very vote.
        newly_decided: Vec<Proposal>,
    },
}

#[derive(Debug, Clone)]
pub struct ProposerState {
    phase: ProposerPhase,
    my_proposal: Option<Proposal>,
    votes: VoteTally,
    evaluator: ConsensusEvaluator,
}

impl ProposerState {
    pub fn new(evaluator: ConsensusEvaluator) -> Self {
        Self {
            phase: ProposerPhase::Idle,
            my_proposal: None,
            votes: VoteTally::new(),
            evaluator,
        }
    }

    pub fn phase(&self) -> ProposerPhase {
        self.phase
    }

    pub fn my_proposal(&self) -> Option<&Proposal> {
        self.my_proposal.as_ref()
    }

    pub fn votes(&self) -> &VoteTally {
        &self.votes
    }

    /// Opens the one round this process gets.
    ///
    /// The id is one above `min_proposal`, the local acceptor's counter (0 on
    /// a process without the acceptor role). Nothing is exchanged beforehand.
    /// Fails when no id is left above `min_proposal`; the state is untouched.
    pub fn begin_round(&mut self, value: char, origin: NodeId, min_proposal: u64) -> Result<Proposal> {
        if self.phase != ProposerPhase::Idle {
            return Err(BallotError::Consensus(format!(
                "a round is already open (phase {})",
                self.phase
            )));
        }

        let id = min_proposal.checked_add(1).ok_or_else(|| {
            BallotError::Consensus(format!("no proposal id left above {}", min_proposal))
        })?;
        let proposal = Proposal::new(id, value, origin);
        self.votes.clear();
        self.votes.register_proposal(&proposal);
        self.my_proposal = Some(proposal.clone());
        self.phase = ProposerPhase::Proposing;
        Ok(proposal)
    }

    /// Fan-out finished. A quorum may already have been reached meanwhile.
    pub fn round_sent(&mut self) {
        if self.phase == ProposerPhase::Proposing {
            self.phase = ProposerPhase::AwaitingVotes;
        }
    }

    /// Counts one acceptor answer, whatever proposal it carries.
    pub fn record_vote(&mut self, proposal: Proposal) -> VoteOutcome {
        if self.phase == ProposerPhase::Idle {
            return VoteOutcome::Ignored;
        }

        let votes = self.votes.register_vote(proposal.clone());

        let newly_decided = if self.evaluator.reaches_quorum(votes) {
            self.phase = ProposerPhase::Decided;
            vec![proposal]
        } else {
            Vec::new()
        };

        VoteOutcome::Counted {
            votes,
            newly_decided,
        }
    }
}
