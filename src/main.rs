//! Feedback collection service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser form (public/)
//!          │  POST /feedback {email, rating, message, agent}
//!          ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │  request id → trace → security headers → cors → limits   │
//!   │                                                          │
//!   │  handlers ─▶ validation ─▶ rate_limit ─▶ storage (SQLite) │
//!   │                                                          │
//!   │  GET /feedback, GET /feedback/{id} ─▶ storage            │
//!   └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use feedback_service::config::{load_config, validate_config, ConfigError, ServiceConfig};
use feedback_service::lifecycle::{startup, Shutdown};
use feedback_service::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "feedback-service")]
#[command(about = "Collects rated feedback from a web form and stores it in SQLite", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `storage.path`.
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(database) = cli.database {
        config.storage.path = database;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability);
    tracing::info!("feedback-service v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
