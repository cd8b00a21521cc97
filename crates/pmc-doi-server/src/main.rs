//! PMC DOI Server Binary
//!
//! Standalone server for the PMC to DOI lookup API.

use std::sync::Arc;

use pmc_doi_core::ServiceConfig;
use pmc_doi_server::{serve, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState::from_config(config)?);

    serve(&addr, state).await
}
