use tracing::debug;

/// Majority of the full acceptor set: `floor(n / 2) + 1`.
pub fn quorum_threshold(acceptors: usize) -> usize {
    acceptors / 2 + 1
}

/// Decides when a tally has reached quorum.
///
/// The acceptor count is the whole set from the registry, not the ones that
/// happen to be reachable; an acceptor that never answers still counts
/// against the majority.
#[derive(Debug, Clone, Copy)]
pub struct ConsensusEvaluator {
    acceptor_count: usize,
}

impl ConsensusEvaluator {
    pub fn new(acceptor_count: usize) -> Self {
        Self { acceptor_count }
    }

    pub fn acceptor_count(&self) -> usize {
        self.acceptor_count
    }

    pub fn threshold(&self) -> usize {
        quorum_threshold(self.acceptor_count)
    }

    /// True only for the vote that lands exactly on the threshold, so each
    /// proposal is reported decided once however many answers follow.
    pub fn reaches_quorum(&self, votes: usize) -> bool {
        let crossed = votes == self.threshold();
        if crossed {
            debug!(
                "quorum {}/{} reached",
                self.threshold(),
                self.acceptor_count()
            );
        }
        crossed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quorum_threshold() {
        assert_eq!(quorum_threshold(1), 1);
        assert_eq!(quorum_threshold(2), 2);
        assert_eq!(quorum_threshold(3), 2);
        assert_eq!(quorum_threshold(4), 3);
        assert_eq!(quorum_threshold(5), 3);
        assert_eq!(quorum_threshold(0), 1);
    }

    #[test]
    fn test_only_the_crossing_vote_reaches_quorum() {
        let evaluator = ConsensusEvaluator::new(5);
        assert_eq!(evaluator.acceptor_count(), 5);

        let crossing: Vec<usize> = (1..=5).filter(|&v| evaluator.reaches_quorum(v)).collect();
        assert_eq!(crossing, vec![3]);
    }
}
