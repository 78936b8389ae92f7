//! Mine log templates from standard input.
//!
//! Reads one log line per input line, then prints the discovered templates,
//! largest cluster first.
//!
//! ```text
//! cat /var/log/syslog | cargo run --example mine_stdin
//! RUST_LOG=log_template_miner=debug cargo run --example mine_stdin < app.log
//! ```
//!
//! Options are read from the environment:
//! - `MINER_DEPTH` (default 4)
//! - `MINER_MAX_CHILDREN` (default 100)
//! - `MINER_TOP` number of templates to print (default 20)

use log_template_miner::{ReporterConfig, TemplateMiner, TemplateReporter};
use std::io::{self, BufRead};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn env_or(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let miner = Arc::new(
        TemplateMiner::builder()
            .with_depth(env_or("MINER_DEPTH", 4))
            .with_max_children(env_or("MINER_MAX_CHILDREN", 100))
            .build()?,
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        miner.parse(&line?);
    }

    let snapshot = miner.metrics().snapshot();
    info!(
        lines = snapshot.lines_parsed,
        skipped = snapshot.lines_skipped,
        clusters = snapshot.clusters_created,
        new_cluster_rate = snapshot.new_cluster_rate(),
        "input exhausted"
    );

    let config = ReporterConfig::default().with_max_templates(env_or("MINER_TOP", 20));
    let reporter = TemplateReporter::new(Arc::clone(&miner), config);

    println!("{:>6}  {:>8}  template", "id", "count");
    for cluster in reporter.collect() {
        println!("{:>6}  {:>8}  {}", cluster.id, cluster.size, cluster.template);
    }

    Ok(())
}
