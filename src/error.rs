//! Error types for the capability layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching creatures from the remote collection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout or other client-level failure.
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("Unexpected status {status} from '{url}'")]
    Status { status: u16, url: String },

    #[error("Invalid URL '{url}'")]
    InvalidUrl { url: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response from '{url}': {message}")]
    Decode { url: String, message: String },

    /// A detail lookup task panicked or was cancelled.
    #[error("Detail lookup task failed: {0}")]
    Join(String),
}

/// Errors raised by key-value store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse store file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to lock store file '{path}': {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored value does not have the expected shape.
    #[error("Failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
