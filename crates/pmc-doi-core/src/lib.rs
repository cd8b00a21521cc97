//! PMC DOI Core - identifier lookup and paced metadata access
//!
//! This crate provides the pieces behind the PMC → DOI service:
//!
//! - **Identifier**: canonical `PMC` ids and PMC/DOI auto-detection
//! - **Store**: read-only PMC → DOI records, file-backed or in memory
//! - **Rate gate**: process-wide pacing of outbound calls (one per second by default)
//! - **Metadata**: Semantic Scholar client that goes through the rate gate
//! - **Config**: service configuration from defaults, TOML and environment

pub mod config;
pub mod error;
pub mod identifier;
pub mod metadata;
pub mod rate_gate;
pub mod store;

pub use config::{MetadataConfig, ServiceConfig};
pub use error::{ConfigError, FetchError, StoreError};
pub use identifier::{looks_like_pmc, MetadataKey, PmcId};
pub use metadata::MetadataClient;
pub use rate_gate::RateGate;
pub use store::{DoiRecord, DoiStore, FileStore, MemoryStore};
