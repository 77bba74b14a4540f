pub mod builder;
pub mod proposal_driver;
