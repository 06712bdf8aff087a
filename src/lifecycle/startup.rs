//! Startup orchestration.
//!
//! Order: metrics exporter, storage (schema created if absent), listener,
//! then the HTTP server. Any failure before serving is fatal.

use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::storage::FeedbackStore;

/// Bring the service up and serve until shutdown.
pub async fn run(config: ServiceConfig, shutdown: &Shutdown) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.storage.path,
        rate_limit_enabled = config.rate_limit.enabled,
        rate_limit_window_secs = config.rate_limit.window_secs,
        rate_limit_max_requests = config.rate_limit.max_requests,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = FeedbackStore::open(&config.storage)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;

    Ok(())
}
