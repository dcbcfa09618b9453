//! ircrpc Daemon
//!
//! Serves the JSON-RPC administration API for an IRC network over HTTP.
//!
//! The binary hosts the in-memory reference network: at startup it knows only
//! the local server from the `network` config section. Users, channels and
//! links are added by an embedding host through the library's
//! [`MemoryNetwork`] API.

use anyhow::{Context, Result};
use clap::Parser;
use ircrpc_core::models::{Config, NetworkConfig};
use ircrpc_core::storage::{init_config_dir, ConfigStorage};
use ircrpc_daemon::{ApiHandler, Credentials, MemoryNetwork, RequestProcessor};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "ircrpcd")]
#[command(about = "ircrpc daemon - JSON-RPC administration API for IRC", long_about = None)]
struct Args {
    /// Config file (defaults to config.json in the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(long)]
    listen: Option<String>,

    /// Log level, overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = init_config_dir()?;
    let storage = match &args.config {
        Some(path) => ConfigStorage::at(path),
        None => ConfigStorage::new(config_dir.clone()),
    };

    let mut config = storage
        .load()
        .with_context(|| format!("Failed to load config from {}", storage.path().display()))?;
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    let log_file_path = config
        .daemon
        .log_file
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir.join("ircrpcd.log"));
    init_logging(&config.daemon.log_level, &log_file_path)?;

    tracing::info!("ircrpc daemon starting...");
    tracing::info!("Config file: {}", storage.path().display());
    tracing::info!("Log file: {}", log_file_path.display());

    run_daemon(config).await
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(listen) = &args.listen {
        config.rpc.listen = listen.clone();
    }
    if let Some(level) = &args.log_level {
        config.daemon.log_level = level.clone();
    }
}

fn init_logging(level: &str, log_file_path: &Path) -> Result<()> {
    // Create log file with append mode
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("Failed to open log file {}", log_file_path.display()))?;

    // Write to both file and stdout
    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let stdout_writer = std::io::stdout.with_max_level(tracing::Level::INFO);
    let file_writer = log_file.with_max_level(tracing::Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(stdout_writer.and(file_writer))
        .with_env_filter(level)
        .with_ansi(false) // No color codes in log file
        .init();

    Ok(())
}

/// The network the daemon serves. Starts with the local server only.
fn host_network(local: &NetworkConfig) -> Arc<MemoryNetwork> {
    let network = Arc::new(MemoryNetwork::new(local.clone()));
    tracing::info!(
        "Network {} initialized as {} (in-memory, no users or channels until added by the host)",
        local.network_name,
        local.server_name
    );
    network
}

async fn run_daemon(config: Config) -> Result<()> {
    if config.rpc.uses_default_password() {
        tracing::warn!(
            "API user '{}' is using the default password; change rpc.api_password",
            config.rpc.api_user
        );
    }

    let network = host_network(&config.network);

    let processor = Arc::new(RequestProcessor::new(
        Credentials::from_config(&config.rpc),
        ApiHandler::new(network),
    ));
    tracing::info!("Request processor initialized");

    let listener = tokio::net::TcpListener::bind(&config.rpc.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.rpc.listen))?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        tracing::info!("Shutting down...");
    };

    tracing::info!("Daemon ready and listening");
    ircrpc_daemon::serve(listener, processor, &config.rpc.path, shutdown).await?;

    Ok(())
}
