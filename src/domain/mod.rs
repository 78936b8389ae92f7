//! Domain layer - pure mining logic with no concurrency concerns.
//!
//! This layer contains the core concepts of template mining:
//! - Line tokenization
//! - Templates and position-wise generalization
//! - Clusters and the cluster store
//! - The bounded fan-out prefix tree
//!
//! Nothing here locks or logs; the application layer wraps these types.

pub mod cluster;
pub mod template;
pub mod token;
pub mod tree;
