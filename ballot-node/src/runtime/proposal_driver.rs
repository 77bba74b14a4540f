use std::{sync::Arc, time::Duration};

use tracing::info;

use ballot_common::{BallotError, Proposal, Result, Role};
use ballot_consensus::ConsensusEngine;

/// Starts this node's round once the other processes had time to come up.
pub struct ProposalDriver {
    engine: Arc<ConsensusEngine>,
    wait: Duration,
    value: Option<char>,
}

impl ProposalDriver {
    pub fn new(engine: Arc<ConsensusEngine>, wait: Duration, value: Option<char>) -> Self {
        Self {
            engine,
            wait,
            value,
        }
    }

    /// `Ok(None)` when this node does not propose at all.
    pub async fn run(&self) -> Result<Option<Proposal>> {
        if !self.engine.is(Role::Proposer) {
            return Ok(None);
        }

        let value = self.value.ok_or_else(|| {
            BallotError::Config(format!("{} is a proposer but no value was given (-v)", self.engine.id()))
        })?;

        info!("⏳ Proposing '{}' in {:?}", value, self.wait);
        tokio::time::sleep(self.wait).await;

        let proposal = self.engine.propose(value).await?;
        info!("📨 Round for {} sent", proposal);
        Ok(Some(proposal))
    }
}
