//! Clusters: one record per discovered log template.
//!
//! The tree refers to clusters only by [`ClusterId`]; the [`ClusterStore`]
//! owns the records. Clusters accumulate for the life of the store and are
//! never removed.

use crate::domain::template::Template;
use ahash::AHashMap;
use serde::Serialize;
use std::fmt;

/// Identifier of a cluster, rendered as `C1`, `C2`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Create an identifier from its sequence number.
    pub fn new(sequence: u64) -> Self {
        ClusterId(sequence)
    }

    /// Parse the rendered form (`C<n>`) back into an identifier.
    ///
    /// Only the exact rendering is accepted: no whitespace, no sign, no
    /// leading zeros. Anything else returns `None`.
    pub fn parse(id: &str) -> Option<Self> {
        let digits = id.strip_prefix('C')?;
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        digits.parse().ok().map(ClusterId)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Occurrence counts keyed by literal line text.
pub type CountMap = AHashMap<String, u64>;

/// One discovered log template and its diagnostics.
#[derive(Debug, Clone)]
pub struct LogCluster {
    id: ClusterId,
    template: Template,
    size: u64,
    raw_logs: CountMap,
}

impl LogCluster {
    /// Create a cluster with no recorded occurrences.
    pub fn new(id: ClusterId, template: Template) -> Self {
        Self {
            id,
            template,
            size: 0,
            raw_logs: CountMap::default(),
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub(crate) fn template_mut(&mut self) -> &mut Template {
        &mut self.template
    }

    /// Total number of lines routed to this cluster.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Per-line occurrence counts for the sampled raw lines.
    pub fn raw_logs(&self) -> &CountMap {
        &self.raw_logs
    }

    /// Record one occurrence of `line`.
    ///
    /// `size` always increases. The line is counted in `raw_logs` if it is
    /// already sampled, or if fewer than `max_samples` distinct lines are.
    pub fn record_occurrence(&mut self, line: &str, max_samples: usize) {
        self.size = self.size.saturating_add(1);

        if let Some(count) = self.raw_logs.get_mut(line) {
            *count = count.saturating_add(1);
        } else if self.raw_logs.len() < max_samples {
            self.raw_logs.insert(line.to_owned(), 1);
        }
    }

    /// Build a point-in-time summary of this cluster.
    pub fn summary(&self) -> ClusterSummary {
        ClusterSummary {
            id: self.id.to_string(),
            template: self.template.to_string(),
            size: self.size,
            wildcard_count: self.template.wildcard_count(),
            samples: self.raw_logs.len(),
        }
    }
}

/// A serializable snapshot of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    /// Cluster identifier (`C<n>`)
    pub id: String,
    /// Space-joined template with `<*>` placeholders
    pub template: String,
    /// Number of lines routed to the cluster
    pub size: u64,
    /// Number of wildcard positions in the template
    pub wildcard_count: usize,
    /// Number of distinct raw lines sampled
    pub samples: usize,
}

/// Owner of all clusters, with a monotonic identifier counter.
#[derive(Debug, Default)]
pub struct ClusterStore {
    clusters: AHashMap<ClusterId, LogCluster>,
    last_sequence: u64,
}

impl ClusterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new cluster seeded with `template` and return its id.
    ///
    /// Identifiers come from a dedicated counter, so they stay unique even
    /// if the map size and the counter ever diverge.
    pub fn create(&mut self, template: Template) -> ClusterId {
        self.last_sequence += 1;
        let id = ClusterId::new(self.last_sequence);
        self.clusters.insert(id, LogCluster::new(id, template));
        id
    }

    pub fn get(&self, id: ClusterId) -> Option<&LogCluster> {
        self.clusters.get(&id)
    }

    pub fn get_mut(&mut self, id: ClusterId) -> Option<&mut LogCluster> {
        self.clusters.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Iterate over all clusters in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &LogCluster> {
        self.clusters.values()
    }
}
