//! PMC DOI Server - lookup API
//!
//! HTTP server resolving PMC ids to DOIs and proxying DOI metadata requests.

pub mod http;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use pmc_doi_core::{
    DoiStore, FetchError, FileStore, MetadataClient, RateGate, ServiceConfig,
};

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "pmc-doi-api";

/// Shared application state
///
/// Handlers keep nothing between requests; the rate gate inside the
/// metadata client is the only mutable piece.
pub struct AppState {
    pub config: ServiceConfig,
    pub store: Arc<dyn DoiStore>,
    pub metadata: MetadataClient,
}

impl AppState {
    pub fn new(config: ServiceConfig, store: Arc<dyn DoiStore>, metadata: MetadataClient) -> Self {
        Self {
            config,
            store,
            metadata,
        }
    }

    /// Create with a file store and a fresh rate gate, as configured
    pub fn from_config(config: ServiceConfig) -> Result<Self, FetchError> {
        let store: Arc<dyn DoiStore> = Arc::new(FileStore::new(&config.data_dir));
        Self::with_store(config, store)
    }

    /// Create with a caller-supplied store
    pub fn with_store(config: ServiceConfig, store: Arc<dyn DoiStore>) -> Result<Self, FetchError> {
        let gate = Arc::new(RateGate::new(config.metadata.min_interval()));
        let metadata = MetadataClient::new(&config.metadata, gate)?;

        Ok(Self::new(config, store, metadata))
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Info endpoints
        .route("/", get(http::root))
        .route("/health", get(http::health))
        // DOI lookup
        .route("/doi", post(http::get_doi_by_body))
        .route("/doi/{pmc_id}", get(http::get_doi_by_path))
        // Metadata proxy; DOIs contain slashes, so capture the whole tail
        .route("/metadata/{*id}", get(http::get_metadata))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Serving records from {:?} (metadata API key {})",
        state.config.data_dir,
        if state.metadata.has_api_key() {
            "configured"
        } else {
            "not configured"
        }
    );

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("PMC DOI server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
