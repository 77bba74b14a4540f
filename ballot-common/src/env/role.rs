use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::BallotError;

/// The three parts a process can play in a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Proposer,
    Acceptor,
    Learner,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Proposer, Role::Acceptor, Role::Learner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Proposer => "proposer",
            Role::Acceptor => "acceptor",
            Role::Learner => "learner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role held by a peer, tagged with the logical process number that
/// pairs a proposer with "its" acceptors and learners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    pub process_number: u32,
}

impl RoleAssignment {
    pub fn new(role: Role, process_number: u32) -> Self {
        Self { role, process_number }
    }
}

impl fmt::Display for RoleAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.role, self.process_number)
    }
}

/// Parses a registry token such as `acceptor12`.
impl FromStr for RoleAssignment {
    type Err = BallotError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let role = Role::ALL
            .into_iter()
            .find(|r| token.starts_with(r.as_str()))
            .ok_or_else(|| BallotError::Config(format!("unknown role token '{token}'")))?;

        let digits = &token[role.as_str().len()..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BallotError::Config(format!(
                "role token '{token}' must end in a process number"
            )));
        }

        let process_number = digits
            .parse::<u32>()
            .map_err(|e| BallotError::Config(format!("role token '{token}': {e}")))?;

        Ok(RoleAssignment::new(role, process_number))
    }
}
