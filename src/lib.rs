//! # log-template-miner
//!
//! Concurrent, streaming log template mining.
//!
//! Feed raw log lines to a [`TemplateMiner`] one at a time. Lines with the
//! same shape collapse into a cluster whose template keeps the shared
//! literal tokens and replaces the differing ones with `<*>`. Each parse
//! returns the cluster identifier and the values found at the wildcard
//! positions.
//!
//! ## Quick Start
//!
//! ```rust
//! use log_template_miner::TemplateMiner;
//!
//! let miner = TemplateMiner::new();
//!
//! miner.parse("user alice logged in from 10.0.0.1 port 22");
//! let result = miner.parse("user alice logged in from 10.0.0.7 port 2201");
//!
//! assert_eq!(result.template_id, "C1");
//! assert_eq!(result.variables, vec!["10.0.0.7", "2201"]);
//! assert_eq!(
//!     miner.template_string("C1"),
//!     "user alice logged in from <*> port <*>"
//! );
//! ```
//!
//! ## How lines are grouped
//!
//! Lines are routed through a fixed-depth prefix tree. The first level is
//! the token count, so lines of different lengths never share a template.
//! The next `depth` levels (default 4) are the leading tokens. Each node
//! holds at most `max_children` children (default 100); once a node is full,
//! unseen tokens at that position share one wildcard branch. Each leaf owns
//! exactly one cluster.
//!
//! Wildcards are one-way: once a position is `<*>` it never becomes a
//! literal again.
//!
//! ## Concurrency
//!
//! One `TemplateMiner` can be shared across threads behind an `Arc`.
//! `parse` runs entirely under a write lock; lookups share a read lock.
//!
//! ## Features
//!
//! - **`tracing` integration**: [`TemplateMiningLayer`] mines the message
//!   of every event passing through a subscriber.
//! - **Metrics**: lines parsed, clusters created, generalizations.
//! - **Periodic reports** (`async` feature): [`TemplateReporter`] emits the
//!   most frequent templates on a tokio task.
//!
//! ```rust
//! use log_template_miner::{TemplateMiner, TemplateMiningLayer};
//! use std::sync::Arc;
//! use tracing_subscriber::prelude::*;
//!
//! let miner = Arc::new(TemplateMiner::new());
//! let subscriber = tracing_subscriber::registry().with(
//!     TemplateMiningLayer::builder()
//!         .with_miner(Arc::clone(&miner))
//!         .with_min_level(tracing::Level::INFO)
//!         .build(),
//! );
//!
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::warn!("disk usage above threshold on /dev/sda1");
//! });
//! assert_eq!(miner.cluster_count(), 1);
//! ```

// Domain layer - pure mining logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    cluster::{ClusterId, ClusterSummary, CountMap, LogCluster},
    template::{MergeOutcome, Template},
    token::{tokenize, WILDCARD},
};

pub use application::{
    config::{ConfigError, MinerConfig},
    metrics::{Metrics, MetricsSnapshot},
    miner::{ParseResult, TemplateMiner, TemplateMinerBuilder},
    reporter::{log_report, ReporterConfig, ReporterConfigError, ShutdownError, TemplateReporter},
};

#[cfg(feature = "async")]
pub use application::reporter::ReporterHandle;

pub use infrastructure::layer::{TemplateMiningLayer, TemplateMiningLayerBuilder};
