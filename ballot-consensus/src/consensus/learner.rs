use ballot_common::Proposal;

/// Everything this learner has been told was decided, in arrival order.
///
/// A single delivered decision is trusted as is; there is no quorum on the
/// learner side.
#[derive(Debug, Default, Clone)]
pub struct LearnerState {
    decided: Vec<Proposal>,
}

impl LearnerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a decision. Returns `false`, and keeps nothing, for a repeat
    /// of one already held.
    pub fn on_decided(&mut self, proposal: Proposal) -> bool {
        if self.decided.contains(&proposal) {
            return false;
        }
        self.decided.push(proposal);
        true
    }

    pub fn decided(&self) -> &[Proposal] {
        &self.decided
    }

    /// The most recent decision.
    pub fn agreed(&self) -> Option<&Proposal> {
        self.decided.last()
    }
}
