use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use swaplane::api::create_router;
use swaplane::config::AppConfig;
use swaplane::error::Result;
use swaplane::oracle::{MockDexRouter, UniformVariance};
use swaplane::store::MemoryOrderStore;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "swaplane", about = "Simulated DEX order execution service")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "SWAPLANE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the gateway port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config.logging.level);

    let oracle = Arc::new(MockDexRouter::new(config.oracle.quote_latency_ms));
    let variance = Arc::new(UniformVariance::default());
    let store = Arc::new(MemoryOrderStore::new());

    let state = swaplane::build_pipeline(&config, oracle, variance, store);
    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("server running on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},swaplane=debug", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
