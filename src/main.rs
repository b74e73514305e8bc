//! LoadRisk batch recomputation.
//!
//! Recomputes weekly load metrics for every athlete in the configured
//! database. An optional first argument names a config TOML file.

use std::path::PathBuf;

use anyhow::Context;
use loadrisk::storage::config::{load_config, load_config_from};
use loadrisk::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LoadRisk v{}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => load_config_from(&PathBuf::from(path)),
        None => load_config(),
    }
    .context("loading configuration")?;

    let mut db = Database::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;

    let aggregator = config.aggregator();
    let summary = db
        .recompute_all(&aggregator)
        .context("recomputing weekly metrics")?;

    let total_rows: usize = summary.iter().map(|(_, rows)| rows).sum();
    tracing::info!(
        "Recomputed {} weekly rows for {} athletes",
        total_rows,
        summary.len()
    );

    Ok(())
}
