use api_rest::AppState;
use frr_core::{resolve_data_dir, CoreConfig};
use frr_types::NonEmptyText;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the FRR application
///
/// Starts the REST server for the field-report repository:
/// report submission, listing, share rendering, notes, and the activity log,
/// with OpenAPI docs under `/swagger-ui`.
///
/// # Environment Variables
/// - `FRR_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `FRR_DATA_DIR`: Directory for report data storage (default: "report_data")
/// - `FRR_OPERATOR`: Operations-unit name recorded on system activity entries
/// - `API_KEY`: API key required by all non-health routes
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("frr=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("FRR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting FRR REST on {}", rest_addr);

    let data_dir = resolve_data_dir(std::env::var("FRR_DATA_DIR").ok());
    let operator = std::env::var("FRR_OPERATOR").unwrap_or_else(|_| "frr.dev.1".into());
    let cfg = Arc::new(CoreConfig::new(data_dir, NonEmptyText::new(operator)?)?);

    api_rest::serve(&rest_addr, AppState::new(cfg)).await
}
