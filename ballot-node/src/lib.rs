pub mod cli;
pub mod config;
pub mod logging;
pub mod runtime;

pub use config::NodeConfig;
pub use runtime::builder::{build_runtime, BallotRuntime};
