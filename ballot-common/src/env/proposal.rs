use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::NodeId;

/// The unit of agreement.
///
/// Two proposals are the same only when id, value and origin all match;
/// votes are tallied on the whole proposal, never on the id alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposal {
    /// Ordering key. Real proposals start at 1; 0 means "no proposal".
    pub id: u64,

    /// The datum being agreed upon.
    pub value: char,

    /// The proposer that authored it.
    pub origin: NodeId,
}

impl Proposal {
    pub fn new(id: u64, value: char, origin: impl Into<NodeId>) -> Self {
        Self {
            id,
            value,
            origin: origin.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.id > 0
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id: {}, value: {}, origin: {}}}",
            self.id, self.value, self.origin
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_covers_every_field() {
        let base = Proposal::new(1, 'x', "alpha");

        assert_eq!(base, Proposal::new(1, 'x', "alpha"));
        assert_ne!(base, Proposal::new(1, 'y', "alpha"));
        assert_ne!(base, Proposal::new(1, 'x', "bravo"));
        assert_ne!(base, Proposal::new(2, 'x', "alpha"));
    }

    #[test]
    fn test_zero_id_is_invalid() {
        assert!(!Proposal::new(0, 'x', "alpha").is_valid());
        assert!(Proposal::new(1, 'x', "alpha").is_valid());
    }

    #[test]
    fn test_display_format() {
        let p = Proposal::new(3, 'z', "host1");
        assert_eq!(p.to_string(), "{id: 3, value: z, origin: host1}");
    }
}
