use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use ballot_common::{BallotError, NodeId, Proposal, Result, Role};
use ballot_p2p::{MessageHandler, Transport};

use super::{
    acceptor::AcceptorState,
    evaluator::ConsensusEvaluator,
    learner::LearnerState,
    proposer::{ProposerPhase, ProposerState, VoteOutcome},
};
use crate::registry::RoleRegistry;

/// Role an outbound record is meant for. Only used to short-circuit sends
/// to ourselves, since the wire record itself carries no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Acceptor,
    Proposer,
    Learner,
}

/// Runs whichever of the three roles the registry gives this node.
///
/// Each role's state sits behind its own mutex and no lock is held while
/// talking to the network.
pub struct ConsensusEngine {
    id: NodeId,
    registry: Arc<RoleRegistry>,
    transport: Arc<dyn Transport>,
    proposer_numbers: BTreeSet<u32>,
    proposer: Option<Mutex<ProposerState>>,
    acceptor: Option<Mutex<AcceptorState>>,
    learner: Option<Mutex<LearnerState>>,
}

impl ConsensusEngine {
    pub fn new(id: NodeId, registry: Arc<RoleRegistry>, transport: Arc<dyn Transport>) -> Self {
        let roles = registry.roles_of(&id);
        if roles.is_empty() {
            warn!("⚠️ {} has no line in the role registry; it will only listen", id);
        } else {
            let assignments: Vec<String> = registry
                .assignments(&id)
                .into_iter()
                .flatten()
                .map(ToString::to_string)
                .collect();
            info!(
                "🧩 {} runs {} ({} acceptors in registry)",
                id,
                assignments.join(","),
                registry.acceptor_count()
            );
        }

        let evaluator = ConsensusEvaluator::new(registry.acceptor_count());
        let proposer_numbers = registry.process_numbers(&id, Role::Proposer);

        Self {
            proposer: roles
                .contains(&Role::Proposer)
                .then(|| Mutex::new(ProposerState::new(evaluator))),
            acceptor: roles
                .contains(&Role::Acceptor)
                .then(|| Mutex::new(AcceptorState::new())),
            learner: roles
                .contains(&Role::Learner)
                .then(|| Mutex::new(LearnerState::new())),
            id,
            registry,
            transport,
            proposer_numbers,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn roles(&self) -> BTreeSet<Role> {
        self.registry.roles_of(&self.id)
    }

    pub fn is(&self, role: Role) -> bool {
        match role {
            Role::Proposer => self.proposer.is_some(),
            Role::Acceptor => self.acceptor.is_some(),
            Role::Learner => self.learner.is_some(),
        }
    }

    /// Starts this node's single round and sends the proposal to every
    /// acceptor sharing one of our proposer process numbers.
    pub async fn propose(&self, value: char) -> Result<Proposal> {
        let proposer = self
            .proposer
            .as_ref()
            .ok_or_else(|| BallotError::Consensus(format!("{} is not a proposer", self.id)))?;

        let min_proposal = match &self.acceptor {
            Some(acceptor) => acceptor.lock().await.min_proposal(),
            None => 0,
        };
        let proposal = proposer
            .lock()
            .await
            .begin_round(value, self.id.clone(), min_proposal)?;

        let acceptors = self
            .registry
            .peers_matching(Role::Acceptor, &self.proposer_numbers);
        info!(target: "consensus", "EVENT:PROPOSE id={} value={} origin={} acceptors={}",
            proposal.id, proposal.value, proposal.origin, acceptors.len());

        if acceptors.is_empty() {
            warn!("⚠️ No acceptor shares a process number with {}; this round cannot decide", self.id);
        }
        for peer in &acceptors {
            info!("[Proposer] [Prepare] {} to {}", proposal, peer);
        }

        self.fan_out(&acceptors, &proposal, Target::Acceptor).await;
        proposer.lock().await.round_sent();

        Ok(proposal)
    }

    /// Proposer side: one acceptor answer.
    pub async fn on_acceptor_reply(&self, proposal: Proposal, from: NodeId) {
        let Some(proposer) = &self.proposer else {
            return;
        };

        let (outcome, mine) = {
            let mut state = proposer.lock().await;
            let outcome = state.record_vote(proposal.clone());
            (outcome, state.my_proposal().cloned())
        };
        let newly_decided = match outcome {
            VoteOutcome::Ignored => {
                debug!("[Proposer] no round open, ignoring {} from {}", proposal, from);
                return;
            }
            VoteOutcome::Counted { votes, newly_decided } => {
                info!("[Proposer] [Recv] {} from {} ({} votes)", proposal, from, votes);
                info!(target: "consensus", "EVENT:RECV role=proposer id={} value={} origin={} from={} votes={}",
                    proposal.id, proposal.value, proposal.origin, from, votes);
                newly_decided
            }
        };

        if newly_decided.is_empty() {
            return;
        }

        let learners = self
            .registry
            .peers_matching(Role::Learner, &self.proposer_numbers);
        if learners.is_empty() {
            warn!("⚠️ No learner shares a process number with {}", self.id);
        }

        for decided in newly_decided {
            if mine.as_ref() == Some(&decided) {
                info!("✅ [Proposer] [Accept] {}", decided);
            } else {
                warn!("⚠️ [Proposer] competing proposal {} won over {:?}", decided, mine);
            }
            info!(target: "consensus", "EVENT:DECIDED id={} value={} origin={} learners={}",
                decided.id, decided.value, decided.origin, learners.len());

            for peer in &learners {
                info!("[Proposer] [Sent] {} to {}", decided, peer);
            }
            self.fan_out(&learners, &decided, Target::Learner).await;
        }
    }

    /// Acceptor side: accept a strictly higher id, then always answer the
    /// origin with whatever is accepted now.
    pub async fn on_proposal(&self, proposal: Proposal, from: NodeId) {
        let Some(acceptor) = &self.acceptor else {
            return;
        };

        info!("📩 [Acceptor] [Recv] {} from {}", proposal, from);
        info!(target: "consensus", "EVENT:RECV role=acceptor id={} value={} origin={} from={}",
            proposal.id, proposal.value, proposal.origin, from);
        let decision = acceptor.lock().await.on_proposal(proposal.clone());

        if decision.accepted {
            info!(target: "consensus", "EVENT:ACCEPT id={} value={} origin={}",
                proposal.id, proposal.value, proposal.origin);
        } else {
            debug!("[Acceptor] {} is not above min_proposal, state unchanged", proposal);
        }

        match decision.reply {
            Some(reply) => {
                info!("[Acceptor] [Sent] {} to {}", reply, proposal.origin);
                info!(target: "consensus", "EVENT:REPLY id={} value={} origin={} to={}",
                    reply.id, reply.value, reply.origin, proposal.origin);
                self.deliver(&proposal.origin, reply, Target::Proposer).await;
            }
            None => warn!("⚠️ [Acceptor] nothing accepted yet, no answer for {}", proposal),
        }
    }

    /// Learner side: trust the decision as delivered.
    pub async fn on_decided(&self, proposal: Proposal, from: NodeId) {
        let Some(learner) = &self.learner else {
            return;
        };

        info!("[Learner] [Recv] {} from {}", proposal, from);
        let (first_time, previous) = {
            let mut state = learner.lock().await;
            let previous = state.agreed().cloned();
            (state.on_decided(proposal.clone()), previous)
        };

        if first_time {
            if let Some(previous) = previous {
                warn!("⚠️ [Learner] {} replaces earlier decision {}", proposal, previous);
            }
            info!("🎉 [Learner] [Accept] {} from {}", proposal, from);
            info!(target: "consensus", "EVENT:LEARNED id={} value={} origin={} from={}",
                proposal.id, proposal.value, proposal.origin, from);
        } else {
            debug!("[Learner] duplicate decision {} from {}", proposal, from);
        }
    }

    /// Routes a record that came in over the network.
    ///
    /// Everything we address to ourselves is delivered in-process, so a
    /// network record naming us as origin is an acceptor's answer to our own
    /// proposal. Anything else goes to every role we run.
    pub async fn dispatch(&self, from: NodeId, proposal: Proposal) {
        if !proposal.is_valid() {
            warn!("⚠️ Dropping {} from {}: id 0 is not a proposal", proposal, from);
            return;
        }

        if proposal.origin == self.id {
            if self.proposer.is_some() {
                self.on_acceptor_reply(proposal, from).await;
            } else {
                warn!(
                    "⚠️ Dropping {} from {}: it names {} as origin but this node is not a proposer",
                    proposal, from, self.id
                );
            }
            return;
        }

        self.on_acceptor_reply(proposal.clone(), from.clone()).await;
        self.on_proposal(proposal.clone(), from.clone()).await;
        self.on_decided(proposal, from).await;
    }

    fn deliver<'a>(&'a self, peer: &'a NodeId, proposal: Proposal, target: Target) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if *peer == self.id {
                let from = self.id.clone();
                match target {
                    Target::Acceptor => self.on_proposal(proposal, from).await,
                    Target::Proposer => self.on_acceptor_reply(proposal, from).await,
                    Target::Learner => self.on_decided(proposal, from).await,
                }
                return;
            }

            if let Err(e) = self.transport.send(peer, &proposal).await {
                let err = BallotError::from(e);
                warn!("❌ Failed to send {} to {}: {}", proposal, peer, err);
            }
        })
    }

    async fn fan_out(&self, peers: &[NodeId], proposal: &Proposal, target: Target) {
        join_all(
            peers
                .iter()
                .map(|peer| self.deliver(peer, proposal.clone(), target)),
        )
        .await;
    }

    pub async fn min_proposal(&self) -> Option<u64> {
        match &self.acceptor {
            Some(acceptor) => Some(acceptor.lock().await.min_proposal()),
            None => None,
        }
    }

    pub async fn accepted(&self) -> Option<Proposal> {
        match &self.acceptor {
            Some(acceptor) => acceptor.lock().await.accepted().cloned(),
            None => None,
        }
    }

    pub async fn proposer_phase(&self) -> Option<ProposerPhase> {
        match &self.proposer {
            Some(proposer) => Some(proposer.lock().await.phase()),
            None => None,
        }
    }

    pub async fn votes_for(&self, proposal: &Proposal) -> usize {
        match &self.proposer {
            Some(proposer) => proposer.lock().await.votes().count(proposal),
            None => 0,
        }
    }

    pub async fn learned(&self) -> Vec<Proposal> {
        match &self.learner {
            Some(learner) => learner.lock().await.decided().to_vec(),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl MessageHandler for ConsensusEngine {
    async fn handle_message(&self, from: NodeId, proposal: Proposal) {
        self.dispatch(from, proposal).await;
    }
}
