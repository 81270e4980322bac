//! Relic Forge
//!
//! # Architecture Overview
//!
//! ```text
//!   watch folders                     ┌──────────────────────────────────────────┐
//!   ─────────────▶ notify ──▶ mpsc ──▶│ Orchestrator (one scan at a time)        │
//!                                     │                                          │
//!                                     │  sequencer ─▶ upload ─▶ mint ─▶ QR code  │
//!                                     │       │          │        │        │     │
//!                                     │       └──────────┴────────┴────────▼     │
//!                                     │                        receipt printer  │
//!                                     └──────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use relic_forge::blockchain::ZoraMinter;
use relic_forge::config::{load_config, load_env_file, ConfigError, RelicConfig, ValidationMode};
use relic_forge::display::LogDisplay;
use relic_forge::lifecycle::{shutdown_signal, Shutdown};
use relic_forge::observability::{logging, metrics};
use relic_forge::pipeline::{run_pipeline, Orchestrator, Publishing};
use relic_forge::printer::{platform_sink, ReceiptPrinter};
use relic_forge::qr::QrEncoder;
use relic_forge::relic::RelicSequencer;
use relic_forge::storage::{BundlerStore, MetadataTemplate, StorageUploader};
use relic_forge::watcher::ScanWatcher;

/// How long an in-flight relic may keep running after shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "relic-forge", version)]
#[command(about = "Watch folders for scans and turn each one into a minted, printed relic")]
struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Print receipts only; minting credentials are neither required nor used
    #[arg(long)]
    receipt_only: bool,

    /// Validate configuration and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Err(e) = load_env_file(cli.env_file.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let mode = if cli.receipt_only {
        ValidationMode::ReceiptOnly
    } else {
        ValidationMode::Full
    };
    let config = match load_config(mode) {
        Ok(config) => config,
        Err(ConfigError::Validation(errors)) => {
            eprintln!("Configuration errors:");
            for (i, error) in errors.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, error);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if cli.check_config {
        print_summary(&config, cli.receipt_only);
        return Ok(());
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("relic-forge v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(address) = &config.observability.metrics_address {
        match address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => {
                tracing::error!(metrics_address = %address, error = %e, "Failed to parse metrics address")
            }
        }
    }

    let publishing = build_publishing(&config, cli.receipt_only)?;
    let printer = ReceiptPrinter::new(platform_sink(&config.printer.name));
    tracing::info!(
        printer = %config.printer.name,
        sink = %printer.describe(),
        "Receipt printer ready"
    );
    tracing::warn!("Relic numbering starts at 001 on every run; ids from earlier runs will repeat");

    let orchestrator = Orchestrator::new(
        RelicSequencer::new(),
        publishing,
        Arc::new(QrEncoder::default()),
        printer,
        Arc::new(LogDisplay),
    );

    let (watcher, scans) =
        ScanWatcher::new(config.watch.folders.clone(), config.watch.queue_capacity);
    let watcher = match watcher.run() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start watching");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    let mut pipeline = tokio::spawn(run_pipeline(orchestrator, scans, shutdown.subscribe()));

    tokio::select! {
        _ = shutdown_signal() => {}
        result = &mut pipeline => {
            tracing::error!(?result, "Pipeline exited unexpectedly");
            return Ok(());
        }
    }

    shutdown.trigger();
    drop(watcher);

    match tokio::time::timeout(SHUTDOWN_GRACE, &mut pipeline).await {
        Ok(Ok(processed)) => tracing::info!(processed, "Pipeline drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Pipeline task failed"),
        Err(_) => {
            tracing::warn!("Abandoning in-flight relic");
            pipeline.abort();
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_summary(config: &RelicConfig, receipt_only: bool) {
    println!("Configuration OK");
    for folder in &config.watch.folders {
        println!("  watch folder:  {}", folder.display());
    }
    println!("  printer:       {}", config.printer.name);
    println!(
        "  minting:       {}",
        if receipt_only || !config.chain.has_credentials() {
            "disabled"
        } else {
            "enabled"
        }
    );
    println!("  chain id:      {}", config.chain.chain_id);
    println!("  rpc url:       {}", config.chain.rpc_url);
    println!("  currency:      {}", config.storage.currency.to_uppercase());
}

/// Storage and chain clients, or `None` when minting is off.
fn build_publishing(
    config: &RelicConfig,
    receipt_only: bool,
) -> Result<Option<Publishing>, Box<dyn std::error::Error>> {
    if receipt_only || !config.chain.has_credentials() {
        tracing::warn!("Minting disabled, receipts will be printed without NFT fields");
        return Ok(None);
    }

    let store = BundlerStore::new(&config.storage)?;
    let minter = ZoraMinter::new(&config.chain)?;

    tracing::info!(
        signer = %minter.signer_address(),
        contract = config.chain.contract_address.as_deref().unwrap_or_default(),
        chain_id = config.chain.chain_id,
        rpc_url = %config.chain.rpc_url,
        upload_url = %store.upload_url(),
        currency = %config.storage.currency.to_uppercase(),
        "Minting enabled"
    );

    let uploader = StorageUploader::new(Arc::new(store), MetadataTemplate::new(&config.metadata));
    Ok(Some(Publishing {
        uploader: Arc::new(uploader),
        minter: Arc::new(minter),
    }))
}
