//! CRM relay server.
//!
//! Long-running host for the relay: mounts it under the configured paths,
//! serves the diagnostics function and, optionally, the built site.
//!
//! ```text
//!  browser ──▶ /hubspot-api/...                ┐
//!  browser ──▶ /.netlify/functions/hubspot/... ┼─▶ relay ──▶ https://api.hubapi.com/...
//!  browser ──▶ /.netlify/functions/test  ──▶ diagnostics
//!  browser ──▶ /anything-else            ──▶ dist/ (index.html fallback)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use crm_relay::config::{apply_port_override, load_config, RelayConfig};
use crm_relay::observability::logging::{self, LogTarget};
use crm_relay::observability::metrics;
use crm_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "crm-relay")]
#[command(about = "CORS relay for the HubSpot API", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Serve the built site from this directory.
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    apply_port_override(&mut config, std::env::var("PORT").ok().as_deref());
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(dir) = cli.static_dir {
        config.static_files.enabled = true;
        config.static_files.dir = dir;
    }

    logging::init(&config.observability.log_level, LogTarget::Stdout);

    tracing::info!("crm-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        credential_present = std::env::var(&config.relay.credential_env).is_ok(),
        mock_crm_mode = std::env::var(&config.relay.mock_mode_env).as_deref() == Ok("true"),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
