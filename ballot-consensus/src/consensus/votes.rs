use std::collections::HashMap;

use ballot_common::Proposal;

/// Vote counts keyed on the whole proposal.
///
/// Two answers only count together when id, value and origin all match, so
/// an acceptor answering with someone else's proposal never helps ours.
#[derive(Debug, Default, Clone)]
pub struct VoteTally {
    votes: HashMap<Proposal, usize>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self {
            votes: HashMap::new(),
        }
    }

    /// Opens an entry with zero votes.
    pub fn register_proposal(&mut self, proposal: &Proposal) {
        self.votes.entry(proposal.clone()).or_insert(0);
    }

    /// Counts one vote and returns the new total for that proposal.
    pub fn register_vote(&mut self, proposal: Proposal) -> usize {
        let count = self.votes.entry(proposal).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, proposal: &Proposal) -> usize {
        self.votes.get(proposal).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.votes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_votes_keyed_on_full_proposal() {
        let mut tally = VoteTally::new();
        let mine = Proposal::new(1, 'x', "p1");
        let same_id_other_value = Proposal::new(1, 'y', "p1");

        tally.register_proposal(&mine);
        assert_eq!(tally.count(&mine), 0);

        assert_eq!(tally.register_vote(mine.clone()), 1);
        assert_eq!(tally.register_vote(same_id_other_value.clone()), 1);
        assert_eq!(tally.register_vote(mine.clone()), 2);

        assert_eq!(tally.count(&mine), 2);
        assert_eq!(tally.count(&same_id_other_value), 1);

        tally.clear();
        assert_eq!(tally.count(&mine), 0);
    }
}
