//! HTTP endpoint handlers
//!
//! Every lookup answers 200 with a `found` flag. Missing records, missing
//! DOIs and upstream failures all come back as `found: false` with a message.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use pmc_doi_core::{FetchError, MetadataKey, PmcId};

use crate::{AppState, SERVICE_NAME};

// ============================================================================
// Info Endpoints
// ============================================================================

/// API information
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "PMC to DOI Lookup API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /": "API information",
            "GET /health": "Health check",
            "GET /doi/{pmc_id}": "Get DOI by PMC ID (path parameter)",
            "POST /doi": "Get DOI by PMC ID (JSON body)",
            "GET /metadata/{id}": "Get paper metadata by DOI or PMC ID"
        },
        "example_usage": {
            "GET": "/doi/PMC2910419 or /doi/2910419",
            "POST": "/doi with body: {\"pmc_id\": \"PMC2910419\"}",
            "METADATA": "/metadata/PMC2910419 or /metadata/10.1186/1471-2164-11-425"
        }
    }))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

// ============================================================================
// DOI Endpoints
// ============================================================================

/// Request body for `POST /doi`
#[derive(Debug, Deserialize)]
pub struct PmcRequest {
    pub pmc_id: String,
}

/// Result of a DOI lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoiResponse {
    pub pmc_id: String,
    pub doi: Option<String>,
    pub found: bool,
    pub message: String,
}

fn not_in_database(id: &PmcId) -> String {
    format!("{} not found in database", id)
}

fn resolve_doi(state: &AppState, input: &str) -> DoiResponse {
    let id = PmcId::normalize(input);

    match state.store.lookup(&id) {
        Some(record) => DoiResponse {
            pmc_id: record.pmc_or(&id),
            doi: record.doi.clone(),
            found: true,
            message: "DOI found successfully".to_string(),
        },
        None => DoiResponse {
            pmc_id: id.to_string(),
            doi: None,
            found: false,
            message: not_in_database(&id),
        },
    }
}

/// Get DOI for a PMC id given in the path (`/doi/PMC2910419` or `/doi/2910419`)
pub async fn get_doi_by_path(
    State(state): State<Arc<AppState>>,
    Path(pmc_id): Path<String>,
) -> Json<DoiResponse> {
    Json(resolve_doi(&state, &pmc_id))
}

/// Get DOI for a PMC id given in a JSON body
pub async fn get_doi_by_body(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PmcRequest>,
) -> Json<DoiResponse> {
    Json(resolve_doi(&state, &request.pmc_id))
}

// ============================================================================
// Metadata Endpoint
// ============================================================================

/// Result of a metadata lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub doi: Option<String>,
    pub pmc_id: Option<String>,
    pub found: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl MetadataResponse {
    fn missing(doi: Option<String>, pmc_id: Option<String>, message: String) -> Self {
        Self {
            doi,
            pmc_id,
            found: false,
            message,
            data: None,
        }
    }
}

fn fetch_failure_message(doi: &str, error: &FetchError) -> String {
    match error {
        FetchError::NotFound => format!("No metadata found for DOI {}", doi),
        FetchError::RateLimited => format!(
            "No metadata found for DOI {} (metadata service rate limit exceeded)",
            doi
        ),
        other => format!("No metadata found for DOI {} ({})", doi, other),
    }
}

/// Get paper metadata for a DOI or a PMC id
///
/// PMC-looking input (`PMC…` or all digits) is converted through the mapping
/// store first; anything else is sent to the metadata service as a DOI.
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<MetadataResponse> {
    let (doi, pmc_id) = match MetadataKey::classify(&id) {
        MetadataKey::Doi(doi) => (doi, None),
        MetadataKey::Pmc(pmc) => {
            let Some(record) = state.store.lookup(&pmc) else {
                return Json(MetadataResponse::missing(
                    None,
                    Some(pmc.to_string()),
                    not_in_database(&pmc),
                ));
            };

            let pmc_id = record.pmc_or(&pmc);
            match record.doi() {
                Some(doi) => (doi.to_string(), Some(pmc_id)),
                None => {
                    tracing::debug!("{} has no DOI, skipping metadata fetch", pmc_id);
                    let message = format!("No DOI available for {}", pmc_id);
                    return Json(MetadataResponse::missing(None, Some(pmc_id), message));
                }
            }
        }
    };

    match state.metadata.fetch_paper(&doi).await {
        Ok(data) => Json(MetadataResponse {
            doi: Some(doi),
            pmc_id,
            found: true,
            message: "Metadata found successfully".to_string(),
            data: Some(data),
        }),
        Err(e) => {
            let message = fetch_failure_message(&doi, &e);
            Json(MetadataResponse::missing(Some(doi), pmc_id, message))
        }
    }
}
