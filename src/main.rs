//! Command-line front-end for the product resolver
//!
//! Results go to stdout as JSON; logs go to stderr (and optionally a file).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

use product_resolver_lib::infrastructure::logging;
use product_resolver_lib::{AppConfig, BatchTable, ConfigManager, ResolverService};

#[derive(Debug, Parser)]
#[command(
    name = "product-resolver",
    version,
    about = "Resolve product codes or names against the storefront catalog",
    after_help = "Settings are read from product_resolver_config.json in the user config directory, then overridden by PRODUCT_RESOLVER_BASE_URL and the flags below."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, value_name = "PATH", global = true, help = "Use this configuration file instead of the default one")]
    config: Option<PathBuf>,

    #[arg(long = "base-url", value_name = "URL", global = true, help = "Storefront base URL")]
    base_url: Option<String>,

    #[arg(long = "pause-ms", value_name = "MS", global = true, help = "Pause after each batch row")]
    pause_ms: Option<u64>,

    #[arg(
        long,
        value_name = "N",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Batch rows resolved at the same time"
    )]
    concurrency: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a single EAN or product name
    Lookup {
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Resolve a JSON array of records with EAN and/or NOME keys
    Batch {
        #[arg(value_name = "FILE.json")]
        input: PathBuf,

        #[arg(long, short, value_name = "PATH", help = "Write the result rows here instead of stdout")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.catalog.base_url = base_url.clone();
        }
        if let Some(pause_ms) = self.pause_ms {
            config.batch.row_pause_ms = pause_ms;
        }
        if let Some(concurrency) = self.concurrency {
            config.batch.max_concurrent_rows = usize::try_from(concurrency).unwrap_or(usize::MAX);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config().await?.with_env_overrides();
    cli.apply_overrides(&mut config);

    logging::init_logging_with_config(&config.logging)?;
    logging::log_system_info();

    let context_label = match cli.command {
        Command::Lookup { .. } => "lookup",
        Command::Batch { .. } => "batch",
    };
    let service = ResolverService::from_config(&config, context_label)?;

    match cli.command {
        Command::Lookup { query } => {
            info!("🔍 Lookup: {}", query);
            let row = service.lookup_row(&query).await?;
            println!("{}", serde_json::to_string_pretty(&row)?);
        }
        Command::Batch { input, output } => {
            let table = read_table(&input).await?;
            info!("📂 Loaded {} rows from {:?}", table.rows.len(), input);

            let rows = service.resolve_table(table).await?;
            let json = serde_json::to_string_pretty(&rows)?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("Failed to write results to {path:?}"))?;
                    info!("💾 Results written to {:?}", path);
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

async fn read_table(path: &Path) -> Result<BatchTable> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read batch input {path:?}"))?;
    let records: Vec<Map<String, Value>> = serde_json::from_str(&content)
        .with_context(|| format!("Batch input {path:?} must be a JSON array of objects"))?;
    Ok(BatchTable::from_records(&records))
}
