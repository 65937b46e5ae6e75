//! Offline inspection CLI for declared config sources.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;

use config_registry::config::loader::load_config;
use config_registry::registry::SourceRegistry;
use config_registry::store::file::FileConnector;
use config_registry::store::{ConfigStore, StoreConnector};

#[derive(Parser)]
#[command(name = "config-inspect")]
#[command(about = "Inspect declared config sources and their merged view", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "registry.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved source order and ordering warnings
    Order,
    /// Show per-source details
    Sources,
    /// Show the merged property view
    Properties,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let connector = FileConnector::new(Duration::from_secs(config.store.poll_interval_secs));
    let mut connections: HashMap<String, Arc<dyn ConfigStore>> = HashMap::new();
    let mut registry = SourceRegistry::new();
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
        registry.register(decl, initial)?;
    }

    let output = match cli.command {
        Commands::Order => json!({
            "order": registry.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "warnings": registry
                .warnings()
                .iter()
                .map(|w| json!({
                    "source": w.source,
                    "directive": w.directive.to_string(),
                    "missing": w.missing,
                }))
                .collect::<Vec<_>>(),
        }),
        Commands::Sources => json!(registry
            .iter()
            .map(|s| json!({
                "name": s.name(),
                "auto_refreshed": s.auto_refreshed(),
                "keys": s.len(),
            }))
            .collect::<Vec<_>>()),
        Commands::Properties => json!(registry.merged()),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
