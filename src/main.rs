//! Config registry agent.
//!
//! Keeps a set of declared configuration sources registered, ordered, and
//! fresh.
//!
//! # Architecture Overview
//!
//! ```text
//!   declaration file (TOML)
//!       │
//!       ▼
//!   ┌─────────┐    ┌────────────┐    ┌──────────────┐
//!   │ config  │───▶│  registry  │◀───│    store     │
//!   │ loader  │    │ (ordered)  │    │  connector   │
//!   └─────────┘    └─────┬──────┘    └──────┬───────┘
//!                        │                  │
//!                        ▼                  ▼
//!                 ┌──────────────┐   ┌──────────────┐
//!                 │ merged view  │   │ watch bridge │
//!                 │  (--out)     │◀──│ + refreshers │
//!                 └──────────────┘   └──────────────┘
//!
//!   Cross-cutting: observability (logging, metrics),
//!                  lifecycle (signals, shutdown)
//! ```
//!
//! Bootstrap is fail-fast: a declaration that cannot be loaded, connected,
//! or registered aborts the agent. After bootstrap, watch errors degrade to
//! stale-but-available values and never abort.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use config_registry::config::loader::load_config;
use config_registry::lifecycle::{signals, Shutdown};
use config_registry::observability::{logging, metrics};
use config_registry::registry::SourceRegistry;
use config_registry::store::file::FileConnector;
use config_registry::store::{ConfigStore, StoreConnector};
use config_registry::watch::bridge::ChangeFuture;
use config_registry::watch::{OnChange, SourceRefresher, WatchBridge};

#[derive(Parser)]
#[command(name = "config-registry")]
#[command(about = "Agent keeping declared config sources registered and fresh", long_about = None)]
struct Args {
    /// Path to the source declaration file.
    #[arg(short, long, default_value = "registry.toml")]
    config: PathBuf,

    /// Write the merged view to this file after every refresh.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    logging::init(&config.observability.log_level);

    tracing::info!(
        config = %args.config.display(),
        sources = config.sources.len(),
        "config-registry v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let connector = FileConnector::new(Duration::from_secs(config.store.poll_interval_secs));

    // Bootstrap: connect, read, register, in declaration order. Fail fast.
    let mut registry = SourceRegistry::new();
    let mut connections: HashMap<String, Arc<dyn ConfigStore>> = HashMap::new();
    let mut registered = Vec::new();
    for decl in &config.sources {
        let store = match connections.get(&decl.connect_string) {
            Some(store) => store.clone(),
            None => {
                let store = connector.connect(&decl.connect_string).await?;
                connections.insert(decl.connect_string.clone(), store.clone());
                store
            }
        };
        let initial = store.read_all(&decl.root_path).await?;
        let source = registry.register(decl, initial)?;
        registered.push((decl.clone(), store, source));
    }
    metrics::set_source_count(registry.len());
    let registry = Arc::new(registry);

    if let Some(out) = &args.out {
        write_merged(&registry, out);
    }

    // Subscribe every auto-refreshed source, one bridge per store target.
    let shutdown = Arc::new(Shutdown::new());
    let mut bridges: HashMap<String, WatchBridge> = HashMap::new();
    let mut handles = Vec::new();
    let mut refreshers = Vec::new();
    for (decl, store, source) in registered {
        if !decl.auto_refreshed {
            continue;
        }
        let bridge = bridges
            .entry(decl.connect_string.clone())
            .or_insert_with(|| WatchBridge::new(store.clone(), config.watch.clone()));

        let refresher = SourceRefresher::new(store.clone(), source, decl.root_path.clone());
        refreshers.push(refresher.clone());

        let callback = refresh_callback(refresher, registry.clone(), args.out.clone());
        handles.push(bridge.subscribe_with_shutdown(&decl.root_path, callback, shutdown.subscribe()));
    }

    tracing::info!(
        sources = registry.len(),
        watched = handles.len(),
        ordering_warnings = registry.warnings().len(),
        "Bootstrap complete"
    );

    tokio::spawn(signals::run(shutdown.clone(), refreshers));

    let mut shutdown_rx = shutdown.subscribe();
    let _ = shutdown_rx.recv().await;

    // Give subscription tasks a bounded window to observe the signal.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    for (connect_string, bridge) in &bridges {
        while bridge.active_subscriptions() > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if bridge.active_subscriptions() > 0 {
            tracing::warn!(store = %connect_string, "Watch subscriptions still active at shutdown deadline");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn refresh_callback(
    refresher: SourceRefresher,
    registry: Arc<SourceRegistry>,
    out: Option<PathBuf>,
) -> OnChange {
    Box::new(move |_event| {
        let refresher = refresher.clone();
        let registry = registry.clone();
        let out = out.clone();
        Box::pin(async move {
            refresher.refresh().await;
            if let Some(out) = &out {
                write_merged(&registry, out);
            }
        }) as ChangeFuture
    })
}

fn write_merged(registry: &SourceRegistry, path: &Path) {
    let merged = registry.merged();
    match serde_json::to_string_pretty(&merged) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                tracing::error!(path = %path.display(), error = %e, "Failed to write merged view");
            } else {
                tracing::debug!(path = %path.display(), keys = merged.len(), "Merged view written");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize merged view");
        }
    }
}
