//! Semantic Scholar metadata client
//!
//! API docs: https://api.semanticscholar.org/api-docs/graph
//! Rate limit: shared pool, paced locally at one request per second

use std::sync::Arc;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::config::MetadataConfig;
use crate::error::FetchError;
use crate::rate_gate::RateGate;

/// Header carrying the optional API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Fetches paper metadata by DOI, one gated request per call
pub struct MetadataClient {
    client: Client,
    gate: Arc<RateGate>,
    base_url: String,
    fields: String,
    api_key: Option<String>,
}

impl MetadataClient {
    pub fn new(config: &MetadataConfig, gate: Arc<RateGate>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            gate,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fields: config.fields.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build `{base}/paper/DOI:{doi}?fields=...`
    ///
    /// The DOI keeps its `/` separators; each segment is percent-encoded.
    /// DOIs with `.` or `..` segments are rejected as not found, since the
    /// URL parser would resolve them away from the paper endpoint.
    pub fn paper_url(&self, doi: &str) -> Result<Url, FetchError> {
        if doi.split('/').any(|segment| segment == "." || segment == "..") {
            tracing::warn!("Rejecting DOI with dot segments: {}", doi);
            return Err(FetchError::NotFound);
        }

        let encoded: Vec<String> = doi
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        let raw = format!("{}/paper/DOI:{}", self.base_url, encoded.join("/"));

        let url = Url::parse_with_params(&raw, &[("fields", self.fields.as_str())])
            .map_err(|e| FetchError::Client(format!("Invalid URL {}: {}", raw, e)))?;

        let base = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Client(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        let paper_prefix = format!("{}/paper/", base.path().trim_end_matches('/'));
        if !url.path().starts_with(&paper_prefix) {
            tracing::warn!("DOI {} resolved outside the paper endpoint: {}", doi, url);
            return Err(FetchError::NotFound);
        }

        Ok(url)
    }

    /// Fetch metadata for a DOI.
    ///
    /// Waits on the rate gate, then issues exactly one GET. No retries.
    pub async fn fetch_paper(&self, doi: &str) -> Result<Value, FetchError> {
        let url = self.paper_url(doi)?;

        self.gate.acquire().await;

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Metadata request for {} failed: {}", doi, e);
            FetchError::Transport(e.to_string())
        })?;

        match response.status() {
            StatusCode::OK => response.json::<Value>().await.map_err(|e| {
                tracing::error!("Undecodable metadata for {}: {}", doi, e);
                FetchError::Decode(e.to_string())
            }),
            StatusCode::NOT_FOUND => {
                tracing::debug!("Metadata service has no paper for {}", doi);
                Err(FetchError::NotFound)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Metadata service rate limit hit for {}", doi);
                Err(FetchError::RateLimited)
            }
            status => {
                tracing::error!("Metadata service returned {} for {}", status, doi);
                Err(FetchError::Status(status.as_u16()))
            }
        }
    }
}
