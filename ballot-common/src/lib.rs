pub mod env;
pub mod error;
pub mod utils;

pub use env::proposal::Proposal;
pub use env::role::{Role, RoleAssignment};
pub use error::{BallotError, Result};
pub use utils::NodeId;
