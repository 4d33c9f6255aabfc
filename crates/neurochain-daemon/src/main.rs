// crates/neurochain-daemon/src/main.rs
//
// Binary entrypoint for the NeuroChain node daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, restores
// the ledger from disk, wires peer resolution, and serves JSON-RPC until
// interrupted.

mod config;
mod peers;
mod resolve_loop;

use std::sync::Arc;

use clap::Parser;
use config::DaemonConfig;

use neurochain_core::traits::ChainStore;
use neurochain_rpc::{LedgerService, NeuroRpcServer, RpcConfig};
use neurochain_store::JsonFileStore;
use peers::PeerRegistry;

/// NeuroChain daemon: a provenance ledger node for AI models.
#[derive(Parser, Debug)]
#[command(name = "neurochain-daemon", version = "0.1.0", about = "NeuroChain ledger node")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "~/.neurochain/config.toml")]
    config: String,

    /// Override the RPC port from the config file.
    #[arg(long)]
    rpc_port: Option<u16>,

    /// Override the data directory from the config file.
    #[arg(long)]
    data_dir: Option<String>,

    /// Add a peer base URL (repeatable). Appended to the configured peers.
    #[arg(long = "peer")]
    peers: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing so the configured level applies;
    // the outcome is logged once the subscriber is up.
    let config_path = expand_tilde(&args.config);
    let loaded = DaemonConfig::load(&config_path);
    let mut daemon_config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => DaemonConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&daemon_config.log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match &loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", config_path),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
    }

    // CLI flags override the config file.
    if let Some(port) = args.rpc_port {
        daemon_config.rpc_port = port;
    }
    if let Some(dir) = args.data_dir {
        daemon_config.data_dir = dir;
    }
    daemon_config.peers.extend(args.peers);

    let data_dir = expand_tilde(&daemon_config.data_dir);
    let peer_urls = daemon_config.effective_peers();

    tracing::info!("NeuroChain Daemon v0.1.0");
    tracing::info!("Data directory: {}", data_dir);
    tracing::info!(
        "RPC endpoint: {}:{}",
        daemon_config.rpc_host,
        daemon_config.rpc_port
    );

    // ---------------------------------------------------------------
    // Ledger + persistence
    // ---------------------------------------------------------------
    let store = JsonFileStore::in_dir(&data_dir);
    tracing::info!("Chain file: {}", store.path().display());
    let store: Arc<dyn ChainStore> = Arc::new(store);
    let ledger = LedgerService::restore_ledger(store.as_ref()).await?;
    let mut service = LedgerService::new(ledger).with_store(store);

    // ---------------------------------------------------------------
    // Peer resolution
    // ---------------------------------------------------------------
    if peer_urls.is_empty() {
        tracing::info!("No peers configured; running standalone");
    } else {
        let registry = Arc::new(PeerRegistry::new(peer_urls.clone()));
        service = service.with_peers(registry.clone());
        tracing::info!(
            "Peer resolution enabled: {} peers configured",
            peer_urls.len()
        );

        if daemon_config.resolve_interval_secs > 0 {
            let loop_service = service.clone();
            let interval = daemon_config.resolve_interval_secs;
            tokio::spawn(async move {
                resolve_loop::run_resolve_loop(loop_service, registry, interval).await;
            });
        }
    }

    // ---------------------------------------------------------------
    // RPC server
    // ---------------------------------------------------------------
    let rpc_config = RpcConfig {
        host: daemon_config.rpc_host.clone(),
        port: daemon_config.rpc_port,
    };
    let rpc_server = NeuroRpcServer::new(rpc_config, service).with_peer_info(peer_urls);

    tokio::select! {
        result = rpc_server.start() => {
            if let Err(e) = result {
                tracing::error!("RPC server error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping");
        }
    }

    Ok(())
}

/// Expand a leading `~/` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}
