//! Infrastructure layer - external adapters and integrations.
//!
//! This layer connects the miner to the `tracing` ecosystem: a `Layer`
//! that mines event messages as they are emitted.

pub mod layer;
pub(crate) mod visitor;
