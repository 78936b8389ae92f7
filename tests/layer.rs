//! Mining templates from a live `tracing` subscriber.

use log_template_miner::{TemplateMiner, TemplateMiningLayer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn, Level};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Counts every event that reaches it.
#[derive(Clone, Default)]
struct CountingLayer {
    count: Arc<AtomicUsize>,
}

impl CountingLayer {
    fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: tracing::Subscriber> Layer<S> for CountingLayer {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reads the miner every time an event arrives.
#[derive(Clone)]
struct ReadingLayer {
    miner: Arc<TemplateMiner>,
    seen: Arc<Mutex<Vec<usize>>>,
}

impl<S: tracing::Subscriber> Layer<S> for ReadingLayer {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.seen.lock().unwrap().push(self.miner.cluster_count());
    }
}

#[test]
fn test_layer_mines_templates() {
    let miner = Arc::new(TemplateMiner::new());
    let layer = TemplateMiningLayer::builder()
        .with_miner(Arc::clone(&miner))
        .build();

    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        for user in ["alice", "bob", "carol"] {
            info!("session opened for user {} from console", user);
        }
        for code in [500, 502] {
            error!("upstream request failed with status {}", code);
        }
    });

    let clusters = miner.clusters();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].template, "session opened for user <*> from console");
    assert_eq!(clusters[0].size, 3);
    assert_eq!(clusters[1].template, "upstream request failed with status <*>");
    assert_eq!(clusters[1].wildcard_count, 1);
}

#[test]
fn test_layer_does_not_filter_events() {
    let capture = CountingLayer::default();
    let mining = TemplateMiningLayer::builder()
        .with_min_level(Level::ERROR)
        .with_excluded_targets(vec!["skipped".to_string()])
        .build();
    let miner = Arc::clone(mining.miner());

    let subscriber = tracing_subscriber::registry()
        .with(mining)
        .with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        info!("below the mining level");
        warn!(target: "skipped", "excluded target");
        error!("mined and passed through");
    });

    assert_eq!(capture.count(), 3);
    assert_eq!(miner.metrics().lines_parsed(), 1);
}

#[test]
fn test_structured_fields_are_not_part_of_the_template() {
    let miner = Arc::new(TemplateMiner::new());
    let subscriber = tracing_subscriber::registry().with(
        TemplateMiningLayer::builder()
            .with_miner(Arc::clone(&miner))
            .build(),
    );

    tracing::subscriber::with_default(subscriber, || {
        info!(request_id = 1, "cache warmed");
        info!(request_id = 2, "cache warmed");
    });

    assert_eq!(miner.cluster_count(), 1);
    assert_eq!(miner.template_string("C1"), "cache warmed");
}

#[test]
fn test_events_without_message_are_ignored() {
    let miner = Arc::new(TemplateMiner::new());
    let subscriber = tracing_subscriber::registry().with(
        TemplateMiningLayer::builder()
            .with_miner(Arc::clone(&miner))
            .build(),
    );

    tracing::subscriber::with_default(subscriber, || {
        info!(queue_depth = 12);
        info!("");
    });

    assert!(miner.is_empty());
    assert_eq!(miner.metrics().lines_parsed(), 0);
    assert_eq!(miner.metrics().lines_skipped(), 1);
}

#[test]
fn test_cloned_layers_share_one_miner() {
    let layer = TemplateMiningLayer::new();
    let miner = Arc::clone(layer.miner());

    let first = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(first, || info!("job 1 done"));

    let second = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(second, || info!("job 2 done"));

    assert_eq!(miner.metrics().lines_parsed(), 2);
}

#[test]
fn test_works_alongside_fmt_layer() {
    let miner = Arc::new(TemplateMiner::new());
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(
            TemplateMiningLayer::builder()
                .with_miner(Arc::clone(&miner))
                .build(),
        );

    tracing::subscriber::with_default(subscriber, || {
        warn!("retrying connection to db-1 in 5 seconds");
    });

    assert_eq!(miner.cluster_count(), 1);
}

#[test]
fn test_direct_parse_with_mining_layer_installed() {
    let miner = Arc::new(TemplateMiner::new());
    let subscriber = tracing_subscriber::registry().with(
        TemplateMiningLayer::builder()
            .with_miner(Arc::clone(&miner))
            .build(),
    );

    tracing::subscriber::with_default(subscriber, || {
        miner.parse("checkpoint written to disk");
        miner.parse("replica lagging behind primary");
    });

    assert_eq!(miner.cluster_count(), 2);
}

#[test]
fn test_subscribers_can_read_the_miner_during_parse() {
    let miner = Arc::new(TemplateMiner::builder().with_depth(1).build().unwrap());
    let reader = ReadingLayer {
        miner: Arc::clone(&miner),
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let subscriber = tracing_subscriber::registry().with(reader.clone());

    tracing::subscriber::with_default(subscriber, || {
        // new cluster, generalization, new cluster
        miner.parse("gc pause 12ms");
        miner.parse("gc pause 40ms");
        miner.parse("heap grown");
    });

    assert_eq!(*reader.seen.lock().unwrap(), vec![1, 1, 2]);
}
