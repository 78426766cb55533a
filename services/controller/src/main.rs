//! Kombiner controller binary.
//!
//! Coordinates pod scheduling across multiple independent schedulers: it
//! watches PlacementRequests, admits them into per-scheduler queues and
//! binds pods to their nominated nodes in fair order.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kombiner_controller::config;
use kombiner_controller::controller::{
    watch_placement_requests, Options, PlacementRequestController,
};
use kombiner_controller::store::KubeStore;

#[derive(Parser)]
#[command(name = "kombiner-controller")]
struct Args {
    /// Path to the controller configuration file.
    #[arg(long)]
    config_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting kombiner controller");

    let args = Args::parse();
    let cfg = config::load(&args.config_file)?;
    info!(queues = cfg.queues.len(), "Configuration loaded");

    let client = kube::Client::try_default().await?;
    let store = Arc::new(KubeStore::new(client.clone()));

    let controller = PlacementRequestController::new(&cfg, store, Options::default())?;
    let admission = controller.admission();

    let shutdown = CancellationToken::new();

    tokio::spawn(watch_placement_requests(
        client,
        admission,
        shutdown.clone(),
    ));

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
        signal_shutdown.cancel();
    });

    controller.run(shutdown).await;

    info!("Controller stopped");
    Ok(())
}
