//! shipmapd — the shipmap daemon.
//!
//! Loads the `ships:` topology, counts connection outcomes reported over
//! HTTP, publishes a snapshot once per interval, and serves the map plus
//! the visualization assets.
//!
//! # Usage
//!
//! ```text
//! shipmapd --port 8080 --config conf.yaml --static-dir dist
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};

use shipmap_core::{ShipsConfig, Topology};
use shipmap_metrics::publisher::DEFAULT_INTERVAL;
use shipmap_metrics::{SnapshotPublisher, TrafficMap};

#[derive(Parser)]
#[command(name = "shipmapd", about = "Live traffic map for a service topology")]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Topology document, read first.
    #[arg(long, default_value = "conf.yaml")]
    config: PathBuf,

    /// Topology document used when `--config` cannot be read.
    #[arg(long, default_value = "/etc/shipmap/conf.yaml")]
    fallback_config: PathBuf,

    /// Directory of visualization assets.
    #[arg(long, default_value = "dist")]
    static_dir: PathBuf,

    /// Snapshot interval in seconds.
    #[arg(
        long,
        default_value_t = DEFAULT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    snapshot_interval: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shipmapd=debug,shipmap=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!("shipmap daemon starting");

    // ── Topology ───────────────────────────────────────────────

    let (config, config_path) = ShipsConfig::load(&cli.config, &cli.fallback_config)?;
    let topology = Topology::build(&config)?;
    let map = Arc::new(TrafficMap::new(&topology));
    info!(
        path = ?config_path,
        nodes = topology.nodes.len(),
        connections = map.accumulator().len(),
        "topology built"
    );
    if map.accumulator().is_empty() {
        warn!("topology has no connections, every ingestion request will be rejected");
    }

    // ── Snapshot publisher ─────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let publisher = SnapshotPublisher::new(
        map.clone(),
        Duration::from_secs(cli.snapshot_interval),
    );
    let publisher_handle = tokio::spawn(async move {
        publisher.run(shutdown_rx).await;
    });

    // ── HTTP server ────────────────────────────────────────────

    let router = shipmap_api::build_router(map, &cli.static_dir);
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, static_dir = ?cli.static_dir, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    let _ = publisher_handle.await;

    info!("shipmap daemon stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_surface() {
        let cli = Cli::try_parse_from(["shipmapd"]).unwrap();
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.config, PathBuf::from("conf.yaml"));
        assert_eq!(cli.static_dir, PathBuf::from("dist"));
        assert_eq!(cli.snapshot_interval, DEFAULT_INTERVAL.as_secs());
    }

    #[test]
    fn zero_snapshot_interval_is_rejected() {
        assert!(Cli::try_parse_from(["shipmapd", "--snapshot-interval", "0"]).is_err());

        let cli = Cli::try_parse_from(["shipmapd", "--snapshot-interval", "1"]).unwrap();
        assert_eq!(cli.snapshot_interval, 1);
    }
}
