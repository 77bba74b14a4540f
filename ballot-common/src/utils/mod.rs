//! utils.rs
//!
//! Small shared types used across the ballot crates.

pub mod node_id;
pub use node_id::NodeId;
