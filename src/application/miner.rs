//! Concurrent template miner.
//!
//! The miner owns the prefix tree and the cluster store behind a single
//! reader/writer lock. `parse` holds the write lock from tokenizing through
//! variable extraction, so no caller ever observes a half-updated template
//! or a leaf bound to an unregistered cluster. Read accessors share the
//! read lock. Diagnostics are logged after the lock is released.

use crate::application::config::{ConfigError, MinerConfig};
use crate::application::metrics::Metrics;
use crate::domain::cluster::{ClusterId, ClusterStore, ClusterSummary};
use crate::domain::template::{MergeOutcome, Template};
use crate::domain::token::tokenize;
use crate::domain::tree::PrefixTree;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

/// Outcome of parsing one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Identifier of the matched or created cluster; empty for blank lines
    pub template_id: String,
    /// Tokens of the line at the template's wildcard positions
    pub variables: Vec<String>,
}

impl ParseResult {
    /// The result for a line with no tokens.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if the line could not be parsed (it had no tokens).
    pub fn is_empty(&self) -> bool {
        self.template_id.is_empty()
    }

    /// Split into `(template_id, variables)`.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.template_id, self.variables)
    }
}

/// What a parse changed, logged once the lock is released.
enum ParseEvent {
    Matched,
    Created {
        id: ClusterId,
        tokens: usize,
    },
    Generalized {
        id: ClusterId,
        new_wildcards: usize,
        template: String,
    },
    LengthMismatch {
        id: ClusterId,
        template_len: usize,
        line_len: usize,
    },
}

#[derive(Debug)]
struct MinerState {
    tree: PrefixTree,
    clusters: ClusterStore,
}

/// Streaming log template miner.
///
/// Groups lines into templates incrementally, never re-scanning earlier
/// input. Safe to share between threads (`Arc<TemplateMiner>`).
///
/// # Example
/// ```
/// use log_template_miner::TemplateMiner;
///
/// let miner = TemplateMiner::new();
///
/// let first = miner.parse("connection closed by peer 10.0.0.1");
/// assert_eq!(first.template_id, "C1");
/// assert!(first.variables.is_empty());
///
/// let second = miner.parse("connection closed by peer 10.0.0.2");
/// assert_eq!(second.template_id, "C1");
/// assert_eq!(second.variables, vec!["10.0.0.2"]);
/// assert_eq!(miner.template_string("C1"), "connection closed by peer <*>");
/// ```
#[derive(Debug)]
pub struct TemplateMiner {
    config: MinerConfig,
    state: RwLock<MinerState>,
    metrics: Metrics,
}

impl TemplateMiner {
    /// Create a miner with the default configuration.
    ///
    /// Defaults: depth 4, max children 100, similarity 0.5, 64 raw samples
    /// per cluster.
    pub fn new() -> Self {
        Self::from_validated(MinerConfig::default())
    }

    /// Create a builder for configuring the miner.
    pub fn builder() -> TemplateMinerBuilder {
        TemplateMinerBuilder {
            config: MinerConfig::default(),
        }
    }

    /// Create a miner from a configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn from_config(config: MinerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: MinerConfig) -> Self {
        Self {
            state: RwLock::new(MinerState {
                tree: PrefixTree::new(config.depth, config.max_children),
                clusters: ClusterStore::new(),
            }),
            config,
            metrics: Metrics::new(),
        }
    }

    /// Parse a log line into a cluster identifier and its variables.
    ///
    /// A line without tokens returns [`ParseResult::empty`]. The line that
    /// creates a cluster reports no variables. Later lines generalize the
    /// cluster's template and report the tokens at its wildcard positions.
    ///
    /// Never fails: malformed input degrades to an empty or stale result.
    pub fn parse(&self, line: &str) -> ParseResult {
        let mut state = self.state.write();

        let tokens = tokenize(line);
        if tokens.is_empty() {
            self.metrics.record_skipped();
            return ParseResult::empty();
        }

        let MinerState { tree, clusters } = &mut *state;
        let leaf = tree.resolve(&tokens);

        let (result, event) = match leaf.cluster_id().and_then(|id| clusters.get_mut(id)) {
            Some(cluster) => {
                let id = cluster.id();
                let event = match cluster.template_mut().merge(&tokens) {
                    MergeOutcome::Unchanged => ParseEvent::Matched,
                    MergeOutcome::Generalized { new_wildcards } => ParseEvent::Generalized {
                        id,
                        new_wildcards,
                        template: cluster.template().to_string(),
                    },
                    MergeOutcome::LengthMismatch => ParseEvent::LengthMismatch {
                        id,
                        template_len: cluster.template().len(),
                        line_len: tokens.len(),
                    },
                };

                cluster.record_occurrence(line, self.config.max_raw_samples);
                let result = ParseResult {
                    template_id: id.to_string(),
                    variables: cluster.template().extract_variables(&tokens),
                };
                (result, event)
            }
            None => {
                let id = clusters.create(Template::from_tokens(&tokens));
                leaf.bind(id);
                if let Some(cluster) = clusters.get_mut(id) {
                    cluster.record_occurrence(line, self.config.max_raw_samples);
                }

                let result = ParseResult {
                    template_id: id.to_string(),
                    variables: Vec::new(),
                };
                (result, ParseEvent::Created { id, tokens: tokens.len() })
            }
        };

        // Subscribers may read the miner while handling these events
        drop(state);
        self.report(event);

        self.metrics.record_parsed();
        result
    }

    fn report(&self, event: ParseEvent) {
        match event {
            ParseEvent::Matched => {}
            ParseEvent::Created { id, tokens } => {
                self.metrics.record_cluster_created();
                debug!(cluster_id = %id, tokens, "new cluster");
            }
            ParseEvent::Generalized {
                id,
                new_wildcards,
                template,
            } => {
                self.metrics.record_generalized();
                trace!(
                    cluster_id = %id,
                    new_wildcards,
                    template = %template,
                    "template generalized"
                );
            }
            ParseEvent::LengthMismatch {
                id,
                template_len,
                line_len,
            } => {
                self.metrics.record_length_mismatch();
                warn!(
                    cluster_id = %id,
                    template_len,
                    line_len,
                    "line routed to a cluster of different length; template left unchanged"
                );
            }
        }
    }

    /// Render a cluster's current template, tokens joined by spaces.
    ///
    /// Returns an empty string for unknown identifiers.
    pub fn template_string(&self, template_id: &str) -> String {
        self.template(template_id)
            .map(|template| template.to_string())
            .unwrap_or_default()
    }

    /// Get a copy of a cluster's current template.
    pub fn template(&self, template_id: &str) -> Option<Template> {
        let id = ClusterId::parse(template_id)?;
        self.state
            .read()
            .clusters
            .get(id)
            .map(|cluster| cluster.template().clone())
    }

    /// Get a summary of one cluster.
    pub fn cluster(&self, template_id: &str) -> Option<ClusterSummary> {
        let id = ClusterId::parse(template_id)?;
        self.state.read().clusters.get(id).map(|c| c.summary())
    }

    /// Summaries of all clusters, largest first.
    ///
    /// Clusters of equal size are ordered by creation.
    pub fn clusters(&self) -> Vec<ClusterSummary> {
        let state = self.state.read();
        let mut clusters: Vec<_> = state.clusters.iter().collect();
        clusters.sort_by(|a, b| b.size().cmp(&a.size()).then(a.id().cmp(&b.id())));
        clusters.into_iter().map(|c| c.summary()).collect()
    }

    /// Number of clusters discovered so far.
    pub fn cluster_count(&self) -> usize {
        self.state.read().clusters.len()
    }

    /// Check if no cluster has been discovered yet.
    pub fn is_empty(&self) -> bool {
        self.state.read().clusters.is_empty()
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get the construction-time configuration.
    pub fn config(&self) -> &MinerConfig {
        &self.config
    }
}

impl Default for TemplateMiner {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a [`TemplateMiner`].
#[derive(Debug, Clone)]
pub struct TemplateMinerBuilder {
    config: MinerConfig,
}

impl TemplateMinerBuilder {
    /// Set how many leading tokens discriminate tree paths.
    ///
    /// Default: 4
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.config.depth = depth;
        self
    }

    /// Set the fan-out cap per tree node.
    ///
    /// Once a node has this many children, unseen tokens at that position
    /// share one wildcard child. Validated when `build()` is called.
    ///
    /// Default: 100
    pub fn with_max_children(mut self, max_children: usize) -> Self {
        self.config.max_children = max_children;
        self
    }

    /// Set the similarity threshold.
    ///
    /// The value is validated and kept in the configuration, but matching
    /// binds one cluster per leaf and never compares similarity.
    ///
    /// Default: 0.5
    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.config.similarity = similarity;
        self
    }

    /// Set how many distinct raw lines each cluster samples.
    ///
    /// Default: 64
    pub fn with_max_raw_samples(mut self, max_raw_samples: usize) -> Self {
        self.config.max_raw_samples = max_raw_samples;
        self
    }

    /// Build the miner.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn build(self) -> Result<TemplateMiner, ConfigError> {
        TemplateMiner::from_config(self.config)
    }
}
