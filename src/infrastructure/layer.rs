//! Tracing integration layer.
//!
//! Provides a `tracing_subscriber::Layer` that feeds the message of every
//! event into a shared [`TemplateMiner`]. The layer only observes: it never
//! filters, drops or rewrites events for the other layers of the subscriber.

use crate::application::miner::TemplateMiner;
use crate::infrastructure::visitor::MessageVisitor;

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

/// Target prefix of this crate's own diagnostics.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Builder for constructing a `TemplateMiningLayer`.
#[derive(Debug, Default)]
pub struct TemplateMiningLayerBuilder {
    miner: Option<Arc<TemplateMiner>>,
    excluded_targets: BTreeSet<String>,
    min_level: Option<Level>,
}

impl TemplateMiningLayerBuilder {
    /// Mine into an existing miner.
    ///
    /// Keep a clone of the `Arc` to read templates while the layer is
    /// installed. Without this a miner with default settings is created.
    pub fn with_miner(mut self, miner: Arc<TemplateMiner>) -> Self {
        self.miner = Some(miner);
        self
    }

    /// Set targets whose events are never mined.
    ///
    /// Targets match exactly. Empty strings are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use log_template_miner::TemplateMiningLayer;
    ///
    /// let layer = TemplateMiningLayer::builder()
    ///     .with_excluded_targets(vec!["hyper::proto".to_string()])
    ///     .build();
    /// ```
    pub fn with_excluded_targets(mut self, targets: Vec<String>) -> Self {
        self.excluded_targets = targets.into_iter().filter(|t| !t.is_empty()).collect();
        self
    }

    /// Only mine events at `level` or more severe.
    ///
    /// Default: `Level::TRACE` (every event).
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = Some(level);
        self
    }

    pub fn build(self) -> TemplateMiningLayer {
        TemplateMiningLayer {
            miner: self
                .miner
                .unwrap_or_else(|| Arc::new(TemplateMiner::new())),
            excluded_targets: Arc::new(self.excluded_targets),
            min_level: self.min_level.unwrap_or(Level::TRACE),
        }
    }
}

/// A `tracing` layer that mines log templates from event messages.
///
/// # Example
///
/// ```
/// use log_template_miner::{TemplateMiner, TemplateMiningLayer};
/// use std::sync::Arc;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let miner = Arc::new(TemplateMiner::new());
/// let layer = TemplateMiningLayer::builder()
///     .with_miner(Arc::clone(&miner))
///     .build();
///
/// let subscriber = tracing_subscriber::registry().with(layer);
/// tracing::subscriber::with_default(subscriber, || {
///     for peer in ["10.0.0.1", "10.0.0.2"] {
///         tracing::info!("connection closed by peer {}", peer);
///     }
/// });
///
/// assert_eq!(miner.template_string("C1"), "connection closed by peer <*>");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateMiningLayer {
    miner: Arc<TemplateMiner>,
    excluded_targets: Arc<BTreeSet<String>>,
    min_level: Level,
}

impl TemplateMiningLayer {
    /// Create a builder for configuring the layer.
    ///
    /// Defaults:
    /// - Miner: a fresh `TemplateMiner::new()`
    /// - Excluded targets: none
    /// - Minimum level: `TRACE`
    pub fn builder() -> TemplateMiningLayerBuilder {
        TemplateMiningLayerBuilder::default()
    }

    /// Create a layer with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Get the miner this layer feeds.
    pub fn miner(&self) -> &Arc<TemplateMiner> {
        &self.miner
    }

    /// Decide from metadata alone whether an event is mined.
    fn should_mine(&self, target: &str, level: &Level) -> bool {
        if *level > self.min_level {
            return false;
        }
        if is_own_target(target) {
            return false;
        }
        self.excluded_targets.is_empty() || !self.excluded_targets.contains(target)
    }
}

impl Default for TemplateMiningLayer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

impl<S> Layer<S> for TemplateMiningLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.should_mine(metadata.target(), metadata.level()) {
            return;
        }

        let mut visitor = MessageVisitor::new();
        event.record(&mut visitor);

        if let Some(message) = visitor.into_message() {
            self.miner.parse(&message);
        }
    }
}
