use ballot_common::Proposal;

/// What an acceptor did with one inbound proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptorDecision {
    /// The inbound id beat `min_proposal` and replaced the accepted proposal.
    pub accepted: bool,
    /// What goes back to the proposal's origin: the highest-id proposal this
    /// acceptor has accepted so far, which may not be the one just received.
    pub reply: Option<Proposal>,
}

/// Acceptor memory: the highest id seen and the proposal that carried it.
#[derive(Debug, Default, Clone)]
pub struct AcceptorState {
    min_proposal: u64,
    accepted: Option<Proposal>,
}

impl AcceptorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_proposal(&self) -> u64 {
        self.min_proposal
    }

    pub fn accepted(&self) -> Option<&Proposal> {
        self.accepted.as_ref()
    }

    /// Accepts any strictly higher id; anything else leaves state untouched.
    /// Either way the reply is the current accepted proposal.
    pub fn on_proposal(&mut self, proposal: Proposal) -> AcceptorDecision {
        let accepted = proposal.id > self.min_proposal;
        if accepted {
            self.min_proposal = proposal.id;
            self.accepted = Some(proposal);
        }

        AcceptorDecision {
            accepted,
            reply: self.accepted.clone(),
        }
    }
}
