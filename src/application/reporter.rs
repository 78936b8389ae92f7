//! Periodic template reports.
//!
//! Collects the most frequent clusters from a shared miner and hands them to
//! a callback at a fixed interval. Collection works without any runtime;
//! the periodic task needs the `async` feature.

use crate::application::miner::TemplateMiner;
use crate::domain::cluster::ClusterSummary;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[cfg(feature = "async")]
use tokio::sync::oneshot;
#[cfg(feature = "async")]
use tokio::task::JoinHandle;

/// Error returned when reporter configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReporterConfigError {
    /// Report interval duration must be greater than zero
    #[error("report interval must be greater than 0")]
    ZeroInterval,
}

/// Error returned when the reporter task did not stop cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShutdownError {
    /// The task panicked while emitting a report
    #[error("reporter task panicked")]
    TaskPanicked,
    /// The task was cancelled before it could stop on its own
    #[error("reporter task was cancelled")]
    TaskCancelled,
}

/// Configuration for periodic reports.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// How often to emit a report
    pub interval: Duration,
    /// Minimum cluster size to include in a report
    pub min_size: u64,
    /// Maximum number of clusters per report
    pub max_templates: usize,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            min_size: 1,
            max_templates: 20,
        }
    }
}

impl ReporterConfig {
    /// Create a reporter config with the specified interval.
    ///
    /// # Errors
    /// Returns `ReporterConfigError::ZeroInterval` if `interval` is zero.
    pub fn new(interval: Duration) -> Result<Self, ReporterConfigError> {
        if interval.is_zero() {
            return Err(ReporterConfigError::ZeroInterval);
        }
        Ok(Self {
            interval,
            ..Self::default()
        })
    }

    /// Set the minimum cluster size threshold.
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the maximum number of clusters per report.
    pub fn with_max_templates(mut self, max_templates: usize) -> Self {
        self.max_templates = max_templates;
        self
    }
}

/// Emits periodic reports of the most frequent templates.
pub struct TemplateReporter {
    miner: Arc<TemplateMiner>,
    config: ReporterConfig,
}

impl TemplateReporter {
    pub fn new(miner: Arc<TemplateMiner>, config: ReporterConfig) -> Self {
        Self { miner, config }
    }

    /// Collect the current report.
    ///
    /// Returns at most `max_templates` clusters of at least `min_size`
    /// lines, largest first.
    pub fn collect(&self) -> Vec<ClusterSummary> {
        self.miner
            .clusters()
            .into_iter()
            .filter(|cluster| cluster.size >= self.config.min_size)
            .take(self.config.max_templates)
            .collect()
    }

    /// Start emitting reports periodically.
    ///
    /// Spawns a task on the current tokio runtime. Empty reports are not
    /// emitted. The task stops when [`ReporterHandle::shutdown`] is called
    /// or the handle is dropped.
    #[cfg(feature = "async")]
    pub fn start<F>(self, mut emit_fn: F) -> ReporterHandle
    where
        F: FnMut(Vec<ClusterSummary>) + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let report = self.collect();
                        if !report.is_empty() {
                            emit_fn(report);
                        }
                    }
                }
            }
        });

        ReporterHandle {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Get the reporter configuration.
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Get the miner being reported on.
    pub fn miner(&self) -> &Arc<TemplateMiner> {
        &self.miner
    }
}

/// Handle to a running reporter task.
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct ReporterHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

#[cfg(feature = "async")]
impl ReporterHandle {
    /// Stop the reporter and wait for its task to finish.
    ///
    /// # Errors
    /// Returns `ShutdownError` if the task panicked or was cancelled.
    pub async fn shutdown(mut self) -> Result<(), ShutdownError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // The task may already be gone; joining below reports why
            let _ = tx.send(());
        }

        match self.task.take() {
            Some(task) => task.await.map_err(|err| {
                if err.is_panic() {
                    ShutdownError::TaskPanicked
                } else {
                    ShutdownError::TaskCancelled
                }
            }),
            None => Ok(()),
        }
    }

    /// Check if the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }
}

/// Log a report through `tracing`, one `info!` event per cluster.
///
/// Suitable as the callback for [`TemplateReporter::start`].
pub fn log_report(report: Vec<ClusterSummary>) {
    for cluster in report {
        info!(
            cluster_id = %cluster.id,
            size = cluster.size,
            wildcards = cluster.wildcard_count,
            template = %cluster.template,
            "log template"
        );
    }
}
