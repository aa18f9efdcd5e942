//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Catalog Browser
//!
//! This module defines the error enum used across the engine, the persistence
//! adapter and the remote catalog client. Library modules return
//! `Result<T, AppError>`; the binary wraps them with `anyhow` context at the
//! edges.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all catalog browser operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization or deserialization error (JSON).
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Transport-level failure talking to the catalog endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog endpoint answered with a non-success status.
    #[error("Catalog endpoint {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The catalog body parsed but did not have the expected shape.
    #[error("Malformed catalog response: {reason}")]
    MalformedCatalog { reason: String },

    /// Durable key-value storage failure.
    #[error("Storage error on key '{key}': {reason}")]
    Storage { key: String, reason: String },

    /// A navigable location could not be parsed.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a malformed catalog error
    pub fn malformed<S: Into<String>>(reason: S) -> Self {
        Self::MalformedCatalog {
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage<S1: Into<String>, S2: Into<String>>(key: S1, reason: S2) -> Self {
        Self::Storage {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status<S: Into<String>>(url: S, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidLocation(e.to_string())
    }
}
