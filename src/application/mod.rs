//! Application layer - orchestration of domain logic.
//!
//! This layer owns the shared state and the runtime behavior:
//! - Template miner (the tree and clusters behind one lock)
//! - Configuration and validation
//! - Mining metrics
//! - Periodic template reports

pub mod config;
pub mod metrics;
pub mod miner;
pub mod reporter;
