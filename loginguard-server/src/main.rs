//! loginguard server
//!
//! Gates login and lost-password forms on a verified challenge token, and
//! serves the settings pages for the network and for each site.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use loginguard_core::store::file::load_snapshot;
use loginguard_core::{
    ConfigResolver, HookRegistry, LoginGuard, MemoryStore, SiteVerifyClient, VerificationGate,
    install,
};
use server::{build_router, run_server};
use shutdown::{spawn_config_reload_handler, spawn_snapshot_writer};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// loginguard - challenge verification for login forms
#[derive(Parser, Debug)]
#[command(name = "loginguard-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "LOGINGUARD_CONFIG", default_value = "./loginguard.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting loginguard-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    let guard_config = loaded_config.guard;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Load stored settings
    let snapshot = load_snapshot(&guard_config.options_path)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to load settings from {:?}: {}",
                guard_config.options_path,
                e
            );
            e
        })?;
    tracing::info!(
        sites = snapshot.sites.len(),
        "Settings loaded from {:?}",
        guard_config.options_path
    );
    let store = MemoryStore::from_snapshot(snapshot);

    // Wire the guard into the filter pipeline
    let resolver = ConfigResolver::new(Arc::new(store.clone()), guard_config.multi_tenant);
    let mut client = SiteVerifyClient::new();
    if let Some(verify_url) = guard_config.verify_url.clone() {
        tracing::info!("Using verification endpoint {}", verify_url);
        client = client.with_endpoint(verify_url);
    }
    let mut registry = HookRegistry::new();
    install(
        &mut registry,
        Arc::new(LoginGuard::new(
            resolver.clone(),
            VerificationGate::new(client),
        )),
    );

    // Create application state
    let state = AppState::new(
        registry,
        resolver,
        Arc::new(store.clone()),
        loaded_config.admin,
    );

    // Persist settings whenever they change
    let (writer_notify, writer_handle) =
        spawn_snapshot_writer(store, guard_config.options_path.clone());

    // Spawn config reload handler (listens for SIGHUP)
    let reload_notify = spawn_config_reload_handler(state.clone(), config_loader, guard_config);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop background tasks
    reload_notify.notify_one();
    writer_notify.notify_one();
    if let Err(e) = writer_handle.await {
        tracing::error!("Settings writer did not finish cleanly: {}", e);
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
