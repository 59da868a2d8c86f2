//! ferrolog Server Binary
//!
//! Starts the TCP server for ferrolog.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use ferrolog::server::Server;
use ferrolog::{Config, Registry, SyncPolicy};

/// ferrolog Server
#[derive(Parser, Debug)]
#[command(name = "ferrolog-server")]
#[command(about = "Minimal commit-log broker with per-topic append-only logs")]
#[command(version)]
struct Args {
    /// Data directory (one subdirectory per topic)
    #[arg(short, long, default_value = "./ferrolog_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "64")]
    max_connections: usize,

    /// Skip the per-append fsync and rely on the OS page cache
    #[arg(long)]
    no_fsync: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ferrolog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("ferrolog Server v{}", ferrolog::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    let sync_policy = if args.no_fsync {
        SyncPolicy::OsFlush
    } else {
        SyncPolicy::EveryAppend
    };

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .sync_policy(sync_policy)
        .build();

    // Open the registry (creates the data directory if needed)
    let registry = match Registry::open(&config.data_dir, config.sync_policy) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            tracing::error!("Failed to open registry: {}", e);
            std::process::exit(1);
        }
    };

    // Bind and run the server
    let mut server = match Server::new(config, registry) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
