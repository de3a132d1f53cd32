//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want
//! the REST server (with OpenAPI/Swagger UI). The workspace's main
//! `frr-run` binary is the deployment entry point.

use api_rest::AppState;
use frr_core::{resolve_data_dir, CoreConfig};
use frr_types::NonEmptyText;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the FRR REST API server
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000) with OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `FRR_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `FRR_DATA_DIR`: Directory for report data storage (default: "report_data")
/// - `FRR_OPERATOR`: Operations-unit name recorded on system activity entries
/// - `API_KEY`: API key required by all non-health routes
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("FRR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting FRR REST API on {}", addr);

    let data_dir = resolve_data_dir(std::env::var("FRR_DATA_DIR").ok());
    let operator = std::env::var("FRR_OPERATOR").unwrap_or_else(|_| "frr.dev.1".into());
    let cfg = Arc::new(CoreConfig::new(data_dir, NonEmptyText::new(operator)?)?);

    api_rest::serve(&addr, AppState::new(cfg)).await
}
