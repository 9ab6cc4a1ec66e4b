//! Storefront router
//!
//! Resolves the tenant of every inbound request, strips its base path,
//! translates SEO-friendly paths and dispatches to the matching handler.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ routing::router ──▶ tenant (store, currency)
//!                                           │
//!                                           ├──▶ routing::canonical (strip prefix)
//!                                           ├──▶ seo (friendly ⇄ canonical)
//!                                           └──▶ routing::cache ──▶ table ──▶ matcher
//!     Client Response
//!     ◀────────────── JSON / 301 / 404 / 405 / 502
//!
//!     Cross-cutting: config (+ watcher), lifecycle, observability
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use storefront_router::config::{load_config, ConfigWatcher, RouterConfig};
use storefront_router::lifecycle::{shutdown_signal, RouterServices, Shutdown};
use storefront_router::observability::{logging, metrics};
use storefront_router::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "storefront-router", version, about = "Multi-tenant SEO-aware storefront router")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config/router.toml")]
    config: PathBuf,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config: RouterConfig = load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("storefront-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        tenants = config.tenants.len(),
        seo_urls = config.seo_urls.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let services = std::sync::Arc::new(RouterServices::from_config(&config));
    let routes = services.warm_up()?;
    tracing::info!(routes, "Route table ready");

    let (watcher, config_updates) = ConfigWatcher::new(&cli.config);
    let _watcher = match watcher.with_route_sources(&config).run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled");
            None
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.trigger();
        }
    });

    let server = HttpServer::with_services(&config, services);
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
