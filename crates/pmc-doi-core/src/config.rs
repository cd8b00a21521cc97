//! Configuration for the PMC → DOI service
//!
//! Defaults, then an optional TOML file, then environment overrides. The
//! resulting struct is handed to constructors explicitly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Path of an optional TOML config file
pub const ENV_CONFIG_PATH: &str = "PMC_DOI_CONFIG";
/// Listen address override
pub const ENV_BIND_ADDR: &str = "PMC_DOI_ADDR";
/// Record directory override
pub const ENV_DATA_DIR: &str = "PMC_DOI_DATA_DIR";
/// Metadata API key
pub const ENV_API_KEY: &str = "SEMANTIC_SCHOLAR_API_KEY";
/// Metadata API base URL override
pub const ENV_BASE_URL: &str = "SEMANTIC_SCHOLAR_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1";
pub const DEFAULT_FIELDS: &str = "title,abstract,authors,year,venue,publicationDate,journal,citationCount,referenceCount,externalIds,url,openAccessPdf";

/// Service-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Directory holding `<PMCID>.json` records
    pub data_dir: PathBuf,
    /// Outbound metadata API settings
    pub metadata: MetadataConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8001".to_string(),
            data_dir: PathBuf::from("data").join("doi"),
            metadata: MetadataConfig::default(),
        }
    }
}

/// Metadata API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Comma-separated field selection sent as `fields=`
    pub fields: String,
    /// Sent as `x-api-key` when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum spacing between outbound calls in milliseconds
    pub min_interval_ms: u64,
    pub user_agent: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fields: DEFAULT_FIELDS.to_string(),
            api_key: None,
            timeout_secs: 30,
            min_interval_ms: 1000,
            user_agent: format!("pmc-doi-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl MetadataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Build from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_PATH) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            config.metadata.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.metadata.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_addr must not be empty".to_string()));
        }

        if self.metadata.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "metadata.base_url must not be empty".to_string(),
            ));
        }

        if self.metadata.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "metadata.timeout_secs must be positive".to_string(),
            ));
        }

        if self.metadata.min_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "metadata.min_interval_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
