//! Observability metrics for template mining.
//!
//! Counters are updated by the miner and can be read at any time without
//! taking the miner's lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking template mining statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Lines routed to a cluster
    lines_parsed: AtomicU64,
    /// Empty or all-whitespace lines
    lines_skipped: AtomicU64,
    /// Clusters created
    clusters_created: AtomicU64,
    /// Merges that introduced at least one new wildcard
    templates_generalized: AtomicU64,
    /// Merges rejected because token counts differed
    length_mismatches: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub(crate) fn record_parsed(&self) {
        self.inner.lines_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.inner.lines_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cluster_created(&self) {
        self.inner.clusters_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_generalized(&self) {
        self.inner
            .templates_generalized
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_length_mismatch(&self) {
        self.inner.length_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    /// Lines that were routed to a cluster.
    pub fn lines_parsed(&self) -> u64 {
        self.inner.lines_parsed.load(Ordering::Relaxed)
    }

    /// Lines ignored because they had no tokens.
    pub fn lines_skipped(&self) -> u64 {
        self.inner.lines_skipped.load(Ordering::Relaxed)
    }

    pub fn clusters_created(&self) -> u64 {
        self.inner.clusters_created.load(Ordering::Relaxed)
    }

    pub fn templates_generalized(&self) -> u64 {
        self.inner.templates_generalized.load(Ordering::Relaxed)
    }

    /// Merges rejected because the template and the line differed in
    /// length. Stays at zero unless the length bucketing is broken.
    pub fn length_mismatches(&self) -> u64 {
        self.inner.length_mismatches.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_parsed: self.lines_parsed(),
            lines_skipped: self.lines_skipped(),
            clusters_created: self.clusters_created(),
            templates_generalized: self.templates_generalized(),
            length_mismatches: self.length_mismatches(),
        }
    }

    /// Reset all metrics to zero.
    ///
    /// Clusters are not affected; only the counters restart.
    pub fn reset(&self) {
        self.inner.lines_parsed.store(0, Ordering::Relaxed);
        self.inner.lines_skipped.store(0, Ordering::Relaxed);
        self.inner.clusters_created.store(0, Ordering::Relaxed);
        self.inner.templates_generalized.store(0, Ordering::Relaxed);
        self.inner.length_mismatches.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub lines_parsed: u64,
    pub lines_skipped: u64,
    pub clusters_created: u64,
    pub templates_generalized: u64,
    pub length_mismatches: u64,
}

impl MetricsSnapshot {
    /// Total number of lines seen (parsed + skipped).
    pub fn total_lines(&self) -> u64 {
        self.lines_parsed.saturating_add(self.lines_skipped)
    }

    /// Fraction of parsed lines that created a new cluster (0.0 to 1.0).
    ///
    /// Returns 0.0 if no lines have been parsed. A rate that stays high
    /// means lines are not collapsing into templates.
    pub fn new_cluster_rate(&self) -> f64 {
        if self.lines_parsed == 0 {
            0.0
        } else {
            self.clusters_created as f64 / self.lines_parsed as f64
        }
    }
}
