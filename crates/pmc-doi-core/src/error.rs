//! Error types for pmc-doi-core

use thiserror::Error;

/// Failures reading a record from the mapping store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading the record file failed for a reason other than absence
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    /// The record file exists but is not a valid record
    #[error("Invalid record in {path}: {message}")]
    Parse { path: String, message: String },
}

/// Failures talking to the metadata API
#[derive(Error, Debug)]
pub enum FetchError {
    /// Remote answered 404
    #[error("Paper not found in metadata service")]
    NotFound,

    /// Remote answered 429
    #[error("Metadata service rate limit exceeded")]
    RateLimited,

    /// Any other non-success status
    #[error("Metadata service returned status {0}")]
    Status(u16),

    /// Connection, TLS or timeout failure
    #[error("Request to metadata service failed: {0}")]
    Transport(String),

    /// 200 response whose body is not JSON
    #[error("Invalid metadata response: {0}")]
    Decode(String),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
